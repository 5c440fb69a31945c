use std::sync::Arc;

use chrono::{Datelike, Local};
use shared::{
    domain::LegalDongSelection,
    pnu::{compose_preview, PnuInput, PnuPreview},
    protocol::{LandCharacteristicsRequest, LandCharacteristicsResponse, LandParcelRecord},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorBanner, ErrorContext, UiError},
    fence::RequestFence,
    selection::SelectionSlot,
    source::LandCharacteristicsService,
};

/// One form edit. Code and name edits write through to the shared selection slot once
/// the pair forms a valid selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    StdrYear(String),
    LegalDongCode(String),
    LegalDongName(String),
    Mountain(bool),
    MainNo(String),
    SubNo(String),
}

/// Snapshot of the submission form, including the shared legal-dong pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelForm {
    pub stdr_year: String,
    pub legal_dong_code: String,
    pub legal_dong_name: String,
    pub mountain: bool,
    pub main_no: String,
    pub sub_no: String,
}

impl ParcelForm {
    pub fn pnu_input(&self) -> PnuInput<'_> {
        PnuInput {
            legal_dong_code: &self.legal_dong_code,
            main_no: &self.main_no,
            sub_no: &self.sub_no,
            mountain: self.mountain,
        }
    }

    pub fn to_request(&self) -> LandCharacteristicsRequest {
        LandCharacteristicsRequest {
            stdr_year: self.stdr_year.clone(),
            legal_dong_code: self.legal_dong_code.clone(),
            mountain: self.mountain,
            main_no: self.main_no.clone(),
            sub_no: self.sub_no.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandCharacteristicsResult {
    pub result_code: String,
    pub result_msg: String,
    pub items: Vec<LandParcelRecord>,
}

impl From<LandCharacteristicsResponse> for LandCharacteristicsResult {
    fn from(response: LandCharacteristicsResponse) -> Self {
        Self {
            result_code: response.result_code,
            result_msg: response.result_msg,
            items: response.items,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(LandCharacteristicsResult),
    Failed(UiError),
}

/// Raw legal-dong text as typed, plus the slot revision it was last synced with.
#[derive(Debug, Default)]
struct LegalDongDraft {
    code: String,
    name: String,
    synced_revision: u64,
}

impl LegalDongDraft {
    /// Adopts the slot's value when another controller wrote it since the last sync.
    fn sync(&mut self, revision: u64, selection: &LegalDongSelection) {
        if revision != self.synced_revision {
            self.code = selection.code().to_string();
            self.name = selection.name().to_string();
            self.synced_revision = revision;
        }
    }

    /// What the slot should hold for the current text: the pair when it validates,
    /// otherwise nothing.
    fn selection(&self) -> LegalDongSelection {
        LegalDongSelection::new(self.code.trim(), self.name.trim()).unwrap_or_default()
    }
}

#[derive(Debug)]
struct OrchestratorState {
    stdr_year: String,
    legal_dong: LegalDongDraft,
    mountain: bool,
    main_no: String,
    sub_no: String,
    submission: SubmissionState,
    fence: RequestFence,
}

impl OrchestratorState {
    fn form(&self) -> ParcelForm {
        ParcelForm {
            stdr_year: self.stdr_year.clone(),
            legal_dong_code: self.legal_dong.code.clone(),
            legal_dong_name: self.legal_dong.name.clone(),
            mountain: self.mountain,
            main_no: self.main_no.clone(),
            sub_no: self.sub_no.clone(),
        }
    }
}

pub struct QueryOrchestrator {
    service: Arc<dyn LandCharacteristicsService>,
    selection: SelectionSlot,
    banner: ErrorBanner,
    state: Mutex<OrchestratorState>,
}

impl QueryOrchestrator {
    /// The standard year starts at the current calendar year.
    pub fn new(
        service: Arc<dyn LandCharacteristicsService>,
        selection: SelectionSlot,
        banner: ErrorBanner,
    ) -> Self {
        Self {
            service,
            selection,
            banner,
            state: Mutex::new(OrchestratorState {
                stdr_year: Local::now().year().to_string(),
                legal_dong: LegalDongDraft::default(),
                mountain: false,
                main_no: String::new(),
                sub_no: String::new(),
                submission: SubmissionState::Idle,
                fence: RequestFence::default(),
            }),
        }
    }

    pub async fn update_field(&self, edit: FormEdit) {
        let mut state = self.state.lock().await;
        match edit {
            FormEdit::LegalDongCode(code) => {
                self.sync_legal_dong(&mut state).await;
                state.legal_dong.code = code;
                self.write_through(&mut state).await;
            }
            FormEdit::LegalDongName(name) => {
                self.sync_legal_dong(&mut state).await;
                state.legal_dong.name = name;
                self.write_through(&mut state).await;
            }
            FormEdit::StdrYear(year) => state.stdr_year = year,
            FormEdit::Mountain(mountain) => state.mountain = mountain,
            FormEdit::MainNo(main_no) => state.main_no = main_no,
            FormEdit::SubNo(sub_no) => state.sub_no = sub_no,
        }
    }

    pub async fn form(&self) -> ParcelForm {
        let mut state = self.state.lock().await;
        self.sync_legal_dong(&mut state).await;
        state.form()
    }

    async fn sync_legal_dong(&self, state: &mut OrchestratorState) {
        let (revision, selection) = self.selection.snapshot().await;
        state.legal_dong.sync(revision, &selection);
    }

    async fn write_through(&self, state: &mut OrchestratorState) {
        let selection = state.legal_dong.selection();
        if selection == self.selection.current().await {
            return;
        }
        debug!(code = selection.code(), "legal-dong form edit written to selection");
        state.legal_dong.synced_revision = self.selection.replace(selection).await;
    }

    pub async fn preview(&self) -> PnuPreview {
        compose_preview(self.form().await.pnu_input())
    }

    pub async fn submission(&self) -> SubmissionState {
        self.state.lock().await.submission.clone()
    }

    pub async fn result(&self) -> Option<LandCharacteristicsResult> {
        match &self.state.lock().await.submission {
            SubmissionState::Success(result) => Some(result.clone()),
            _ => None,
        }
    }

    /// Sends the structured form; the service composes and validates the PNU itself.
    pub async fn submit(&self) {
        let (request, token) = {
            let mut state = self.state.lock().await;
            self.sync_legal_dong(&mut state).await;
            state.submission = SubmissionState::Submitting;
            (state.form().to_request(), state.fence.issue())
        };
        self.banner.clear().await;
        info!(
            legal_dong_code = %request.legal_dong_code,
            stdr_year = %request.stdr_year,
            "submitting land characteristics lookup"
        );

        let outcome = self.service.lookup(&request).await;

        let mut state = self.state.lock().await;
        if !state.fence.is_current(token) {
            debug!(main_no = %request.main_no, "discarding superseded lookup response");
            return;
        }
        match outcome {
            Ok(response) => {
                debug!(count = response.items.len(), "lookup succeeded");
                state.submission = SubmissionState::Success(response.into());
            }
            Err(err) => {
                warn!(%err, "land characteristics lookup failed");
                let error = UiError::from_source(ErrorContext::Submission, err);
                state.submission = SubmissionState::Failed(error.clone());
                self.banner.show(error).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
