//! Contracts for the two remote collaborators the engine talks to.

use async_trait::async_trait;
use shared::{
    domain::{AdministrativeRegion, CodeSearchMatch, RegionLevel},
    protocol::{LandCharacteristicsRequest, LandCharacteristicsResponse},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Non-success status. `message` is the body's `error` text when it had one.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// Success status whose body could not be decoded; carries the raw text.
    #[error("malformed response body")]
    Malformed(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Administrative-code directory: region lists per level plus free-text code search.
#[async_trait]
pub trait RegionCodeSource: Send + Sync {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeRegion>, SourceError>;

    async fn list_districts(
        &self,
        sido_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError>;

    async fn list_sub_districts(
        &self,
        sigungu_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError>;

    async fn search_codes(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CodeSearchMatch>, SourceError>;

    /// Lists `level`; `parent_code` is ignored for provinces.
    async fn list_regions(
        &self,
        level: RegionLevel,
        parent_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError> {
        match level {
            RegionLevel::Sido => self.list_provinces().await,
            RegionLevel::Sigungu => self.list_districts(parent_code).await,
            RegionLevel::Eupmyeondong => self.list_sub_districts(parent_code).await,
        }
    }
}

#[async_trait]
pub trait LandCharacteristicsService: Send + Sync {
    async fn lookup(
        &self,
        request: &LandCharacteristicsRequest,
    ) -> Result<LandCharacteristicsResponse, SourceError>;
}
