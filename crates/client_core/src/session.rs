use std::sync::Arc;

use tracing::info;

use crate::{
    cascade::CascadeController,
    code_search::CodeSearchController,
    config::ClientSettings,
    error::{ErrorBanner, UiError},
    orchestrator::QueryOrchestrator,
    selection::SelectionSlot,
    source::{LandCharacteristicsService, RegionCodeSource},
    transport::HttpApiClient,
};

/// One lookup screen: the three controllers around one selection slot and one error banner.
pub struct LookupSession {
    pub cascade: CascadeController,
    pub search: CodeSearchController,
    pub orchestrator: QueryOrchestrator,
    selection: SelectionSlot,
    banner: ErrorBanner,
}

impl LookupSession {
    pub fn new(
        source: Arc<dyn RegionCodeSource>,
        service: Arc<dyn LandCharacteristicsService>,
    ) -> Self {
        let selection = SelectionSlot::default();
        let banner = ErrorBanner::default();
        Self {
            cascade: CascadeController::new(source.clone(), selection.clone(), banner.clone()),
            search: CodeSearchController::new(source, selection.clone(), banner.clone()),
            orchestrator: QueryOrchestrator::new(service, selection.clone(), banner.clone()),
            selection,
            banner,
        }
    }

    /// Session backed by the HTTP service at `settings.api_base_url`.
    pub fn connect(settings: &ClientSettings) -> Self {
        info!(base_url = %settings.api_base_url, "lookup session using HTTP service");
        let client = Arc::new(HttpApiClient::from_settings(settings));
        Self::new(client.clone(), client)
    }

    /// Loads the province list.
    pub async fn start(&self) {
        self.cascade.activate().await;
    }

    pub fn selection(&self) -> &SelectionSlot {
        &self.selection
    }

    pub async fn error(&self) -> Option<UiError> {
        self.banner.current().await
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
