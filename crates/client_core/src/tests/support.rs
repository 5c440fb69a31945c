//! Scripted in-memory collaborators for controller tests.
//!
//! Every call is keyed (`"districts:41"`, `"search:세교"`, `"lookup:449"`). A key can be gated so
//! its response waits until the test releases it, or scripted to fail.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use shared::{
    domain::{AdministrativeRegion, CodeSearchMatch, CodeStatus},
    protocol::{LandCharacteristicsRequest, LandCharacteristicsResponse, LandParcelRecord},
};
use tokio::sync::{oneshot, Mutex};

use crate::source::{LandCharacteristicsService, RegionCodeSource, SourceError};

pub(crate) fn region(code: &str, name: &str) -> AdministrativeRegion {
    AdministrativeRegion::new(code, name)
}

pub(crate) fn code_match(code: &str, name: &str, status: CodeStatus) -> CodeSearchMatch {
    CodeSearchMatch {
        code: code.into(),
        name: name.into(),
        status,
    }
}

#[derive(Default)]
struct Script {
    gates: HashMap<String, oneshot::Receiver<()>>,
    failures: HashMap<String, SourceError>,
    calls: Vec<String>,
}

impl Script {
    fn gate(&mut self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.insert(key.to_string(), rx);
        tx
    }
}

/// Waits on the key's gate (if any), then reports the scripted failure (if any).
async fn enter(script: &Mutex<Script>, key: String) -> Result<(), SourceError> {
    let gate = {
        let mut script = script.lock().await;
        script.calls.push(key.clone());
        script.gates.remove(&key)
    };
    if let Some(gate) = gate {
        let _ = gate.await;
    }
    match script.lock().await.failures.get(&key) {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

#[derive(Default)]
pub(crate) struct ScriptedSource {
    provinces: Vec<AdministrativeRegion>,
    districts: HashMap<String, Vec<AdministrativeRegion>>,
    sub_districts: HashMap<String, Vec<AdministrativeRegion>>,
    matches: HashMap<String, Vec<CodeSearchMatch>>,
    script: Mutex<Script>,
}

impl ScriptedSource {
    /// Directory used across controller tests: Seoul and Gyeonggi, down to a few dongs.
    pub(crate) fn sample() -> Self {
        let mut source = Self {
            provinces: vec![region("11", "서울특별시"), region("41", "경기도")],
            ..Self::default()
        };
        source.districts.insert(
            "11".into(),
            vec![region("11110", "종로구"), region("11140", "중구")],
        );
        source.districts.insert(
            "41".into(),
            vec![region("41110", "수원시"), region("41220", "평택시")],
        );
        source.sub_districts.insert(
            "41110".into(),
            vec![
                region("4122010600", "영통구 망포동"),
                region("4111112900", "장안구 파장동"),
            ],
        );
        source.sub_districts.insert(
            "41220".into(),
            vec![region("4122010100", "평택동")],
        );
        source.matches.insert(
            "세교".into(),
            vec![
                code_match("4122010600", "경기도 평택시 세교동", CodeStatus::Active),
                code_match("4122010699", "경기도 평택시 옛세교동", CodeStatus::Abolished),
            ],
        );
        source
    }

    pub(crate) fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) async fn gate(&self, key: &str) -> oneshot::Sender<()> {
        self.script.lock().await.gate(key)
    }

    pub(crate) async fn fail(&self, key: &str, err: SourceError) {
        self.script
            .lock()
            .await
            .failures
            .insert(key.to_string(), err);
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.script.lock().await.calls.clone()
    }
}

#[async_trait]
impl RegionCodeSource for ScriptedSource {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeRegion>, SourceError> {
        enter(&self.script, "provinces".into()).await?;
        Ok(self.provinces.clone())
    }

    async fn list_districts(
        &self,
        sido_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError> {
        enter(&self.script, format!("districts:{sido_code}")).await?;
        Ok(self.districts.get(sido_code).cloned().unwrap_or_default())
    }

    async fn list_sub_districts(
        &self,
        sigungu_code: &str,
    ) -> Result<Vec<AdministrativeRegion>, SourceError> {
        enter(&self.script, format!("sub_districts:{sigungu_code}")).await?;
        Ok(self.sub_districts.get(sigungu_code).cloned().unwrap_or_default())
    }

    async fn search_codes(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CodeSearchMatch>, SourceError> {
        enter(&self.script, format!("search:{query}")).await?;
        let mut found = self.matches.get(query).cloned().unwrap_or_default();
        found.truncate(limit);
        Ok(found)
    }
}

/// Answers every lookup with one record whose `pnu` echoes the request's main number.
#[derive(Default)]
pub(crate) struct ScriptedLookup {
    script: Mutex<Script>,
    requests: Mutex<Vec<LandCharacteristicsRequest>>,
}

impl ScriptedLookup {
    pub(crate) fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) async fn gate(&self, main_no: &str) -> oneshot::Sender<()> {
        self.script.lock().await.gate(&format!("lookup:{main_no}"))
    }

    pub(crate) async fn fail(&self, main_no: &str, err: SourceError) {
        self.script
            .lock()
            .await
            .failures
            .insert(format!("lookup:{main_no}"), err);
    }

    pub(crate) async fn requests(&self) -> Vec<LandCharacteristicsRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LandCharacteristicsService for ScriptedLookup {
    async fn lookup(
        &self,
        request: &LandCharacteristicsRequest,
    ) -> Result<LandCharacteristicsResponse, SourceError> {
        self.requests.lock().await.push(request.clone());
        enter(&self.script, format!("lookup:{}", request.main_no)).await?;
        Ok(LandCharacteristicsResponse {
            result_code: "00".into(),
            result_msg: "정상".into(),
            items: vec![LandParcelRecord {
                pnu: Some(format!("main-{}", request.main_no)),
                ..LandParcelRecord::default()
            }],
            count: 1,
            request: None,
        })
    }
}

/// Recorded call keys, ignoring order and repeats.
pub(crate) fn call_set(calls: &[String]) -> HashSet<&str> {
    calls.iter().map(String::as_str).collect()
}
