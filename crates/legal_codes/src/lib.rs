use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use shared::domain::{AdministrativeRegion, CodeSearchMatch, CodeStatus, RegionLevel};
use tracing::{info, warn};

const SIDO_SUFFIX: &str = "00000000";
const SIGUNGU_SUFFIX: &str = "00000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalCodeRow {
    pub code: String,
    pub name: String,
    pub status: CodeStatus,
}

impl LegalCodeRow {
    pub fn new(code: impl Into<String>, name: impl Into<String>, status: CodeStatus) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            status,
        }
    }

    fn is_active(&self) -> bool {
        self.status.is_active()
    }

    fn to_region(&self, level: RegionLevel) -> AdministrativeRegion {
        let code = self.code.get(..level.code_width()).unwrap_or(&self.code);
        AdministrativeRegion::new(code, self.name.clone())
    }

    fn to_match(&self) -> CodeSearchMatch {
        CodeSearchMatch {
            code: self.code.clone(),
            name: self.name.clone(),
            status: self.status,
        }
    }
}

/// In-memory legal-dong code table backing the directory routes.
#[derive(Debug, Clone, Default)]
pub struct LegalCodeDirectory {
    rows: Vec<LegalCodeRow>,
}

impl LegalCodeDirectory {
    pub fn new(rows: Vec<LegalCodeRow>) -> Self {
        Self { rows }
    }

    /// Loads `code,name,status` rows. A missing file yields an empty directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "legal code table not found; directory is empty");
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("failed to open legal code table '{}'", path.display()))?;
        let directory = Self::from_reader(file)
            .with_context(|| format!("failed to parse legal code table '{}'", path.display()))?;
        info!(path = %path.display(), rows = directory.len(), "legal code table loaded");
        Ok(directory)
    }

    /// Reads CSV with a header row. Rows with fewer than three columns are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, record) in csv.records().enumerate() {
            let record =
                record.with_context(|| format!("invalid record at data row {}", line + 1))?;
            if record.len() < 3 {
                continue;
            }
            rows.push(LegalCodeRow::new(
                record[0].trim(),
                record[1].trim(),
                CodeStatus::from_label(&record[2]),
            ));
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive substring match on name or code, in table order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<CodeSearchMatch> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.rows.iter().take(limit).map(LegalCodeRow::to_match).collect();
        }

        self.rows
            .iter()
            .filter(|row| {
                row.name.to_lowercase().contains(&query) || row.code.to_lowercase().contains(&query)
            })
            .take(limit)
            .map(LegalCodeRow::to_match)
            .collect()
    }

    pub fn sido(&self) -> Vec<AdministrativeRegion> {
        self.active_regions(RegionLevel::Sido, |row| is_sido(&row.code))
    }

    pub fn sigungu(&self, sido_code: &str) -> Vec<AdministrativeRegion> {
        let Some(prefix) = level_prefix(sido_code, RegionLevel::Sido) else {
            return Vec::new();
        };
        self.active_regions(RegionLevel::Sigungu, |row| {
            is_sigungu(&row.code) && row.code.starts_with(prefix)
        })
    }

    pub fn eupmyeondong(&self, sigungu_code: &str) -> Vec<AdministrativeRegion> {
        let Some(prefix) = level_prefix(sigungu_code, RegionLevel::Sigungu) else {
            return Vec::new();
        };
        self.active_regions(RegionLevel::Eupmyeondong, |row| {
            row.code.starts_with(prefix) && !is_sigungu(&row.code) && !is_sido(&row.code)
        })
    }

    fn active_regions(
        &self,
        level: RegionLevel,
        keep: impl Fn(&LegalCodeRow) -> bool,
    ) -> Vec<AdministrativeRegion> {
        let mut rows: Vec<&LegalCodeRow> = self
            .rows
            .iter()
            .filter(|row| row.is_active() && keep(row))
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        rows.into_iter().map(|row| row.to_region(level)).collect()
    }
}

/// Leading digits of a parent code, accepting either the level width or a full 10-digit code.
fn level_prefix(code: &str, level: RegionLevel) -> Option<&str> {
    let code = code.trim();
    let width = level.code_width();
    let prefix = code.get(..width)?;
    prefix.bytes().all(|b| b.is_ascii_digit()).then_some(prefix)
}

fn is_sido(code: &str) -> bool {
    code.len() == 10 && code.ends_with(SIDO_SUFFIX)
}

fn is_sigungu(code: &str) -> bool {
    code.len() == 10 && code.ends_with(SIGUNGU_SUFFIX) && !is_sido(code)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
