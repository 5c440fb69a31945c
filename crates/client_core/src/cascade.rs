//! Three-level province / district / sub-district selection.
//!
//! [`CascadeState`] holds the transitions as plain functions: a `select_*` call clears every
//! dependent level at once and hands back the fetch to run. [`CascadeController`] drives them
//! against a [`RegionCodeSource`] and writes completed picks into the shared selection slot.

use std::sync::Arc;

use shared::domain::{AdministrativeRegion, LegalDongSelection, RegionLevel};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorBanner, ErrorContext, UiError},
    fence::{FenceToken, RequestFence},
    selection::SelectionSlot,
    source::RegionCodeSource,
};

/// Options and current pick for one level. An empty `selected` means nothing is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelState {
    pub options: Vec<AdministrativeRegion>,
    pub selected: String,
}

impl LevelState {
    fn reset(&mut self) {
        self.options.clear();
        self.selected.clear();
    }
}

/// A list request produced by a transition; `level` is the list being fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub level: RegionLevel,
    pub parent_code: Option<String>,
    pub token: FenceToken,
}

#[derive(Debug, Clone, Default)]
pub struct CascadeState {
    sido: LevelState,
    sigungu: LevelState,
    eupmyeondong: LevelState,
    sido_fence: RequestFence,
    sigungu_fence: RequestFence,
    eupmyeondong_fence: RequestFence,
}

impl CascadeState {
    pub fn level(&self, level: RegionLevel) -> &LevelState {
        match level {
            RegionLevel::Sido => &self.sido,
            RegionLevel::Sigungu => &self.sigungu,
            RegionLevel::Eupmyeondong => &self.eupmyeondong,
        }
    }

    fn level_mut(&mut self, level: RegionLevel) -> &mut LevelState {
        match level {
            RegionLevel::Sido => &mut self.sido,
            RegionLevel::Sigungu => &mut self.sigungu,
            RegionLevel::Eupmyeondong => &mut self.eupmyeondong,
        }
    }

    fn fence_mut(&mut self, level: RegionLevel) -> &mut RequestFence {
        match level {
            RegionLevel::Sido => &mut self.sido_fence,
            RegionLevel::Sigungu => &mut self.sigungu_fence,
            RegionLevel::Eupmyeondong => &mut self.eupmyeondong_fence,
        }
    }

    fn fetch(&mut self, level: RegionLevel, parent_code: Option<&str>) -> PendingFetch {
        PendingFetch {
            level,
            parent_code: parent_code.map(str::to_string),
            token: self.fence_mut(level).issue(),
        }
    }

    /// Province list request issued on activation.
    pub fn activate(&mut self) -> PendingFetch {
        self.fetch(RegionLevel::Sido, None)
    }

    pub fn select_sido(&mut self, code: &str) -> Option<PendingFetch> {
        self.sido.selected = code.to_string();
        self.sigungu.reset();
        self.eupmyeondong.reset();
        self.eupmyeondong_fence.invalidate();

        if code.is_empty() {
            self.sigungu_fence.invalidate();
            return None;
        }
        Some(self.fetch(RegionLevel::Sigungu, Some(code)))
    }

    /// Ignored while no province is selected.
    pub fn select_sigungu(&mut self, code: &str) -> Option<PendingFetch> {
        if self.sido.selected.is_empty() {
            return None;
        }
        self.sigungu.selected = code.to_string();
        self.eupmyeondong.reset();

        if code.is_empty() {
            self.eupmyeondong_fence.invalidate();
            return None;
        }
        Some(self.fetch(RegionLevel::Eupmyeondong, Some(code)))
    }

    /// Records the pick and returns the matching entry of the current list, if any.
    pub fn select_eupmyeondong(&mut self, code: &str) -> Option<AdministrativeRegion> {
        self.eupmyeondong.selected = code.to_string();
        self.eupmyeondong
            .options
            .iter()
            .find(|region| region.code == code)
            .cloned()
    }

    /// Installs `regions` if `fetch` is still the latest request for its level.
    pub fn apply_regions(
        &mut self,
        fetch: &PendingFetch,
        regions: Vec<AdministrativeRegion>,
    ) -> bool {
        if !self.fence_mut(fetch.level).is_current(fetch.token) {
            return false;
        }
        self.level_mut(fetch.level).options = regions;
        true
    }

    /// Leaves the level's list empty if `fetch` is still current; higher levels are untouched.
    pub fn apply_failure(&mut self, fetch: &PendingFetch) -> bool {
        if !self.fence_mut(fetch.level).is_current(fetch.token) {
            return false;
        }
        self.level_mut(fetch.level).options.clear();
        true
    }

    pub fn view(&self) -> CascadeView {
        CascadeView {
            provinces: self.sido.clone(),
            districts: self.sigungu.clone(),
            sub_districts: self.eupmyeondong.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeView {
    pub provinces: LevelState,
    pub districts: LevelState,
    pub sub_districts: LevelState,
}

pub struct CascadeController {
    source: Arc<dyn RegionCodeSource>,
    selection: SelectionSlot,
    banner: ErrorBanner,
    state: Mutex<CascadeState>,
}

impl CascadeController {
    pub fn new(
        source: Arc<dyn RegionCodeSource>,
        selection: SelectionSlot,
        banner: ErrorBanner,
    ) -> Self {
        Self {
            source,
            selection,
            banner,
            state: Mutex::new(CascadeState::default()),
        }
    }

    pub async fn activate(&self) {
        let fetch = self.state.lock().await.activate();
        self.run_fetch(fetch).await;
    }

    pub async fn select_sido(&self, code: &str) {
        let fetch = self.state.lock().await.select_sido(code);
        if let Some(fetch) = fetch {
            self.run_fetch(fetch).await;
        }
    }

    pub async fn select_sigungu(&self, code: &str) {
        let fetch = self.state.lock().await.select_sigungu(code);
        if let Some(fetch) = fetch {
            self.run_fetch(fetch).await;
        }
    }

    pub async fn select_eupmyeondong(&self, code: &str) {
        let picked = self.state.lock().await.select_eupmyeondong(code);
        let Some(region) = picked else {
            debug!(code, "sub-district not in current list; selection unchanged");
            return;
        };
        match LegalDongSelection::try_from(&region) {
            Ok(selection) => {
                info!(code = selection.code(), "legal-dong selected from cascade");
                self.selection.replace(selection).await;
            }
            Err(err) => warn!(%err, "ignoring sub-district with unusable code"),
        }
    }

    pub async fn snapshot(&self) -> CascadeView {
        self.state.lock().await.view()
    }

    async fn run_fetch(&self, fetch: PendingFetch) {
        self.banner.clear().await;
        let parent = fetch.parent_code.as_deref().unwrap_or_default();
        let result = self.source.list_regions(fetch.level, parent).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(regions) => {
                let count = regions.len();
                if state.apply_regions(&fetch, regions) {
                    debug!(level = ?fetch.level, parent, count, "region list applied");
                } else {
                    debug!(level = ?fetch.level, parent, "discarding stale region list");
                }
            }
            Err(err) => {
                if !state.apply_failure(&fetch) {
                    debug!(level = ?fetch.level, parent, %err, "discarding stale region failure");
                    return;
                }
                warn!(level = ?fetch.level, parent, %err, "region list fetch failed");
                self.banner
                    .show(UiError::from_source(ErrorContext::for_level(fetch.level), err))
                    .await;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/cascade_tests.rs"]
mod tests;
