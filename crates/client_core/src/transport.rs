//! HTTP implementation of both collaborator contracts against the JSON service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AdministrativeRegion, CodeSearchMatch},
    error::ErrorBody,
    protocol::{
        ItemsResponse, LandCharacteristicsRequest, LandCharacteristicsResponse, CODE_SEARCH_ROUTE,
        EUPMYEONDONG_ROUTE, LAND_CHARACTERISTICS_ROUTE, SIDO_ROUTE, SIGUNGU_ROUTE,
    },
};
use tracing::debug;

use crate::{
    config::ClientSettings,
    source::{LandCharacteristicsService, RegionCodeSource, SourceError},
};

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
}

impl HttpApiClient {
    /// `base_url` is expected without a trailing `/`; see [`crate::config::normalize_base_url`].
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SourceError> {
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        debug!(%status, bytes = text.len(), "service responded");
        decode_body(status, &text)
    }

    async fn list(
        &self,
        route: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<AdministrativeRegion>, SourceError> {
        let body: ItemsResponse<AdministrativeRegion> = self
            .fetch(self.http.get(self.endpoint(route)).query(query))
            .await?;
        Ok(body.items)
    }
}

/// Maps a status and body text onto the typed response or a [`SourceError`].
///
/// Failure bodies contribute their `error` field, or their whole text when it is not JSON.
/// An empty success body reads as `{}`.
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, SourceError> {
    let trimmed = text.trim();
    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorBody>(trimmed) {
            Ok(body) => body.error.filter(|m| !m.trim().is_empty()),
            Err(_) => (!trimmed.is_empty()).then(|| trimmed.to_string()),
        };
        return Err(SourceError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let body = if trimmed.is_empty() { "{}" } else { trimmed };
    serde_json::from_str(body).map_err(|_| SourceError::Malformed(text.to_string()))
}

#[async_trait]
impl RegionCodeSource for HttpApiClient {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeRegion>, SourceError> {
        self.list(SIDO_ROUTE, &[]).await
    }

    async fn list_districts(
        &self,
        sido_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError> {
        self.list(SIGUNGU_ROUTE, &[("sidoCode", sido_code)]).await
    }

    async fn list_sub_districts(
        &self,
        sigungu_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError> {
        self.list(EUPMYEONDONG_ROUTE, &[("sigunguCode", sigungu_code)])
            .await
    }

    async fn search_codes(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CodeSearchMatch>, SourceError> {
        let limit = limit.to_string();
        let body: ItemsResponse<CodeSearchMatch> = self
            .fetch(
                self.http
                    .get(self.endpoint(CODE_SEARCH_ROUTE))
                    .query(&[("q", query), ("limit", limit.as_str())]),
            )
            .await?;
        Ok(body.items)
    }
}

#[async_trait]
impl LandCharacteristicsService for HttpApiClient {
    async fn lookup(
        &self,
        request: &LandCharacteristicsRequest,
    ) -> Result<LandCharacteristicsResponse, SourceError> {
        self.fetch(
            self.http
                .post(self.endpoint(LAND_CHARACTERISTICS_ROUTE))
                .json(request),
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
