//! Legal-dong workbook to CSV conversion.
//!
//! The official workbook keeps `code, name, status` in the first three columns of its
//! first sheet, under one header row.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use csv::Writer;

pub const HEADER: [&str; 3] = ["법정동코드", "법정동명", "폐지여부"];

/// Spreadsheet tools detect UTF-8 by this marker.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub type LegalCodeRecord = [String; 3];

/// Reads sheet 0 of `workbook` and writes the table to `out`. Returns the rows written.
pub fn extract_legal_codes(workbook: &Path, out: &Path) -> Result<usize> {
    let mut book = open_workbook_auto(workbook)
        .with_context(|| format!("failed to open workbook '{}'", workbook.display()))?;
    let sheet = book
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook '{}' has no sheets", workbook.display()))?
        .with_context(|| format!("failed to read first sheet of '{}'", workbook.display()))?;

    let records = legal_code_records(sheet.rows().skip(1));

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    let file =
        File::create(out).with_context(|| format!("failed to create '{}'", out.display()))?;
    write_legal_codes(file, &records)?;
    Ok(records.len())
}

/// Trimmed first three cells of each row. Rows with neither a code nor a name are dropped.
pub fn legal_code_records<'a>(rows: impl Iterator<Item = &'a [Data]>) -> Vec<LegalCodeRecord> {
    rows.filter_map(|row| {
        let cell = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();
        let (code, name, status) = (cell(0), cell(1), cell(2));
        if code.is_empty() && name.is_empty() {
            return None;
        }
        Some([code, name, status])
    })
    .collect()
}

pub fn write_legal_codes<W: Write>(mut out: W, records: &[LegalCodeRecord]) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut writer = Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        Data::Int(n) => n.to_string(),
        // codes typed as numbers come back as floats
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
#[path = "tests/workbook_tests.rs"]
mod tests;
