//! Plain view models for the result and search tables. Absent values render as [`PLACEHOLDER`].

use shared::{
    domain::{CodeSearchMatch, LegalDongSelection},
    protocol::{LandParcelRecord, PLACEHOLDER},
};

use crate::{code_search::SearchPanel, orchestrator::LandCharacteristicsResult};

pub const COLUMN_HEADERS: [&str; 14] = [
    "고유번호",
    "법정동명",
    "지번",
    "기준연도",
    "지목명",
    "토지면적",
    "토지이용상황",
    "용도지역1",
    "용도지역2",
    "도로접면",
    "지형형상",
    "지형높이",
    "공시지가",
    "기준일자",
];

pub const MATCH_HEADERS: [&str; 3] = ["법정동코드", "법정동명", "폐지여부"];

pub const EMPTY_SEARCH_MESSAGE: &str = "검색 결과가 없습니다. 다른 키워드로 시도해 주세요.";
pub const SEARCHING_MESSAGE: &str = "검색 중...";
pub const UNSELECTED_LABEL: &str = "(미지정)";

fn cell(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

pub fn record_row(record: &LandParcelRecord) -> [String; 14] {
    [
        cell(record.pnu.as_deref()),
        cell(record.legal_dong_name.as_deref()),
        cell(record.parcel_number()),
        cell(record.stdr_year.as_deref()),
        cell(record.land_category.as_deref()),
        cell(record.area.as_deref()),
        cell(record.usage_situation.as_deref()),
        cell(record.zoning_primary.as_deref()),
        cell(record.zoning_secondary.as_deref()),
        cell(record.road_contact.as_deref()),
        cell(record.terrain_shape.as_deref()),
        cell(record.terrain_height.as_deref()),
        cell(record.assessed_price.as_deref()),
        cell(record.last_updated.as_deref()),
    ]
}

pub fn record_rows(result: &LandCharacteristicsResult) -> Vec<[String; 14]> {
    result.items.iter().map(record_row).collect()
}

pub fn match_row(matched: &CodeSearchMatch) -> [String; 3] {
    [
        matched.code.clone(),
        matched.name.clone(),
        matched.status.label().to_string(),
    ]
}

pub fn result_summary(result: &LandCharacteristicsResult) -> String {
    format!(
        "응답코드: {} / 메시지: {}",
        cell(Some(&result.result_code)),
        cell(Some(&result.result_msg))
    )
}

pub fn selected_name_label(selection: &LegalDongSelection) -> String {
    let name = selection.name().trim();
    if name.is_empty() {
        UNSELECTED_LABEL.to_string()
    } else {
        name.to_string()
    }
}

/// Status line under the search box. Results render as a table instead.
pub fn search_panel_message(panel: &SearchPanel) -> Option<String> {
    match panel {
        SearchPanel::NeverSearched | SearchPanel::Results(_) => None,
        SearchPanel::Searching => Some(SEARCHING_MESSAGE.to_string()),
        SearchPanel::Empty => Some(EMPTY_SEARCH_MESSAGE.to_string()),
        SearchPanel::Failed(err) => Some(err.message.clone()),
    }
}
