use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

pub const LEGAL_DONG_CODE_LEN: usize = 10;

const ACTIVE_LABEL: &str = "존재";
const ABOLISHED_LABEL: &str = "폐지";

/// Returns true for a syntactically valid 10-digit legal-dong code.
pub fn is_legal_dong_code(code: &str) -> bool {
    code.len() == LEGAL_DONG_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionLevel {
    Sido,
    Sigungu,
    Eupmyeondong,
}

impl RegionLevel {
    /// Number of leading legal-dong code digits that identify a region at this level.
    pub fn code_width(self) -> usize {
        match self {
            RegionLevel::Sido => 2,
            RegionLevel::Sigungu => 5,
            RegionLevel::Eupmyeondong => LEGAL_DONG_CODE_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdministrativeRegion {
    pub code: String,
    pub name: String,
}

impl AdministrativeRegion {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeStatus {
    #[serde(rename = "존재")]
    Active,
    #[serde(rename = "폐지")]
    Abolished,
}

impl CodeStatus {
    /// Anything other than the active marker counts as abolished.
    pub fn from_label(raw: &str) -> Self {
        if raw.trim() == ACTIVE_LABEL {
            CodeStatus::Active
        } else {
            CodeStatus::Abolished
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CodeStatus::Active => ACTIVE_LABEL,
            CodeStatus::Abolished => ABOLISHED_LABEL,
        }
    }

    pub fn is_active(self) -> bool {
        self == CodeStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSearchMatch {
    pub code: String,
    pub name: String,
    pub status: CodeStatus,
}

/// The legal-dong code and display name the parcel query is built from.
///
/// Either empty (the default) or a 10-digit code with a non-empty name; the only
/// way to build a non-empty value is [`LegalDongSelection::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalDongSelection {
    code: String,
    name: String,
}

impl LegalDongSelection {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Result<Self, SelectionError> {
        let code = code.into();
        let name = name.into();
        if !is_legal_dong_code(&code) {
            return Err(SelectionError::InvalidCode(code));
        }
        if name.trim().is_empty() {
            return Err(SelectionError::MissingName(code));
        }
        Ok(Self { code, name })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl TryFrom<&AdministrativeRegion> for LegalDongSelection {
    type Error = SelectionError;

    fn try_from(region: &AdministrativeRegion) -> Result<Self, Self::Error> {
        Self::new(region.code.clone(), region.name.clone())
    }
}

impl TryFrom<&CodeSearchMatch> for LegalDongSelection {
    type Error = SelectionError;

    fn try_from(matched: &CodeSearchMatch) -> Result<Self, Self::Error> {
        Self::new(matched.code.clone(), matched.name.clone())
    }
}
