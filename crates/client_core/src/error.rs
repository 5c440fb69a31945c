use std::sync::Arc;

use shared::domain::RegionLevel;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::source::SourceError;

/// Which operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    ProvinceList,
    DistrictList,
    SubDistrictList,
    CodeSearch,
    Submission,
}

impl ErrorContext {
    pub fn for_level(level: RegionLevel) -> Self {
        match level {
            RegionLevel::Sido => Self::ProvinceList,
            RegionLevel::Sigungu => Self::DistrictList,
            RegionLevel::Eupmyeondong => Self::SubDistrictList,
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::ProvinceList => "province list fetch failed",
            Self::DistrictList => "district list fetch failed",
            Self::SubDistrictList => "sub-district list fetch failed",
            Self::CodeSearch => "legal-dong code search failed",
            Self::Submission => "land characteristics lookup failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Rejected,
    Transport,
    Malformed,
}

/// User-facing error, shown in the session banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UiError {
    pub context: ErrorContext,
    pub kind: ErrorKind,
    pub message: String,
}

impl UiError {
    pub fn from_source(context: ErrorContext, err: SourceError) -> Self {
        let (kind, message) = match err {
            SourceError::Rejected { message, .. } => (
                ErrorKind::Rejected,
                message.unwrap_or_else(|| context.fallback_message().to_string()),
            ),
            SourceError::Malformed(raw) => (ErrorKind::Malformed, raw),
            SourceError::Transport(reason) => (
                ErrorKind::Transport,
                format!("{}: {reason}", context.fallback_message()),
            ),
        };
        Self {
            context,
            kind,
            message,
        }
    }
}

/// The single visible error slot shared by every controller of a session.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
    inner: Arc<RwLock<Option<UiError>>>,
}

impl ErrorBanner {
    pub async fn current(&self) -> Option<UiError> {
        self.inner.read().await.clone()
    }

    pub async fn show(&self, error: UiError) {
        *self.inner.write().await = Some(error);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
