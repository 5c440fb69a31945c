//! Dependent selection and PNU composition engine for land-characteristics lookups.
//!
//! A [`LookupSession`] wires the cascading region picker, the free-text code search and the
//! submission form around one shared legal-dong selection. Each network-backed slot is fenced
//! so only its most recent request may change what is visible.

pub mod cascade;
pub mod code_search;
pub mod config;
pub mod error;
pub mod fence;
pub mod orchestrator;
pub mod render;
pub mod selection;
pub mod session;
pub mod source;
pub mod transport;

pub use cascade::{CascadeController, CascadeState, CascadeView, LevelState, PendingFetch};
pub use code_search::{CodeSearchController, SearchPanel, SEARCH_RESULT_LIMIT};
pub use config::ClientSettings;
pub use error::{ErrorBanner, ErrorContext, ErrorKind, UiError};
pub use fence::{FenceToken, RequestFence};
pub use orchestrator::{
    FormEdit, LandCharacteristicsResult, ParcelForm, QueryOrchestrator, SubmissionState,
};
pub use selection::SelectionSlot;
pub use session::LookupSession;
pub use source::{LandCharacteristicsService, RegionCodeSource, SourceError};
pub use transport::HttpApiClient;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
