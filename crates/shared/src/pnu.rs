//! PNU (parcel number unique) composition.
//!
//! A PNU is `legal-dong code (10) + mountain digit (1) + main number (4) + sub number (4)`.
//! The lenient preview used while a form is being edited and the strict composition
//! used by the lookup service share [`Pnu::assemble`], so both always agree on layout.

use std::fmt;

use thiserror::Error;

use crate::{domain::is_legal_dong_code, protocol::PLACEHOLDER};

pub const PNU_LEN: usize = 19;
pub const PARCEL_NUMBER_MAX: u32 = 9999;

const GENERAL_DIGIT: char = '1';
const MOUNTAIN_DIGIT: char = '2';

pub fn mountain_digit(mountain: bool) -> char {
    if mountain {
        MOUNTAIN_DIGIT
    } else {
        GENERAL_DIGIT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pnu(String);

impl Pnu {
    fn assemble(legal_dong_code: &str, mountain: bool, main_no: u32, sub_no: u32) -> Self {
        Self(format!(
            "{legal_dong_code}{}{main_no:04}{sub_no:04}",
            mountain_digit(mountain)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn legal_dong_code(&self) -> &str {
        &self.0[..10]
    }

    pub fn is_mountain(&self) -> bool {
        self.0.as_bytes()[10] == MOUNTAIN_DIGIT as u8
    }
}

impl fmt::Display for Pnu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pnu {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PnuInput<'a> {
    pub legal_dong_code: &'a str,
    pub main_no: &'a str,
    pub sub_no: &'a str,
    pub mountain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PnuPreview {
    Complete(Pnu),
    /// The form is not finished yet; rendered as a placeholder.
    Incomplete,
}

impl PnuPreview {
    pub fn as_pnu(&self) -> Option<&Pnu> {
        match self {
            PnuPreview::Complete(pnu) => Some(pnu),
            PnuPreview::Incomplete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PnuPreview::Complete(_))
    }
}

impl fmt::Display for PnuPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PnuPreview::Complete(pnu) => f.write_str(pnu.as_str()),
            PnuPreview::Incomplete => f.write_str(PLACEHOLDER),
        }
    }
}

/// Advisory preview. Non-numeric or negative parcel numbers read as `0`. A digits-only
/// number above 9999 or a legal-dong code that is not yet 10 digits leaves the preview
/// incomplete, since no real parcel matches it.
pub fn compose_preview(input: PnuInput<'_>) -> PnuPreview {
    let code = input.legal_dong_code.trim();
    let main_no = input.main_no.trim();
    let sub_no = input.sub_no.trim();
    if code.is_empty() || main_no.is_empty() || sub_no.is_empty() {
        return PnuPreview::Incomplete;
    }
    if !is_legal_dong_code(code) {
        return PnuPreview::Incomplete;
    }

    match (lenient_parcel_number(main_no), lenient_parcel_number(sub_no)) {
        (Some(main), Some(sub)) => {
            PnuPreview::Complete(Pnu::assemble(code, input.mountain, main, sub))
        }
        _ => PnuPreview::Incomplete,
    }
}

/// `None` when the input is a number too large for a parcel.
fn lenient_parcel_number(raw: &str) -> Option<u32> {
    if !is_digits(raw) {
        return Some(0);
    }
    strict_parcel_number(raw).ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PnuError {
    #[error("legalDongCode must be a 10-digit code")]
    InvalidLegalDongCode,
    #[error("mainNo must be numeric")]
    MainNoNotNumeric,
    #[error("subNo must be numeric")]
    SubNoNotNumeric,
    #[error("mainNo and subNo must be <= 9999")]
    ParcelNumberOutOfRange,
}

/// Authoritative composition: every field must already be well formed.
pub fn compose_strict(
    legal_dong_code: &str,
    main_no: &str,
    sub_no: &str,
    mountain: bool,
) -> Result<Pnu, PnuError> {
    if !is_legal_dong_code(legal_dong_code) {
        return Err(PnuError::InvalidLegalDongCode);
    }
    if !is_digits(main_no) {
        return Err(PnuError::MainNoNotNumeric);
    }
    if !is_digits(sub_no) {
        return Err(PnuError::SubNoNotNumeric);
    }
    let main = strict_parcel_number(main_no)?;
    let sub = strict_parcel_number(sub_no)?;

    Ok(Pnu::assemble(legal_dong_code, mountain, main, sub))
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

fn strict_parcel_number(raw: &str) -> Result<u32, PnuError> {
    // digits-only input can still overflow u32
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n <= PARCEL_NUMBER_MAX)
        .ok_or(PnuError::ParcelNumberOutOfRange)
}

#[cfg(test)]
#[path = "tests/pnu_tests.rs"]
mod tests;
