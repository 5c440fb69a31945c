use super::*;

use legal_codes::LegalCodeDirectory;
use shared::domain::{AdministrativeRegion, CodeStatus};

fn text(value: &str) -> Data {
    Data::String(value.to_string())
}

fn sheet_rows() -> Vec<Vec<Data>> {
    vec![
        vec![text("1100000000"), text(" 서울특별시 "), text("존재")],
        vec![Data::Float(1111000000.0), text("서울특별시 종로구"), text("존재")],
        vec![Data::Empty, Data::Empty, text("존재")],
        vec![Data::Int(1111010100), text("서울특별시 종로구 청운동")],
        vec![text("1111099999"), text("서울특별시 종로구 옛동"), text(" 폐지 ")],
        vec![],
    ]
}

fn records() -> Vec<LegalCodeRecord> {
    let rows = sheet_rows();
    legal_code_records(rows.iter().map(Vec::as_slice))
}

#[test]
fn rows_are_trimmed_and_blank_rows_dropped() {
    let records = records();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0], ["1100000000", "서울특별시", "존재"].map(String::from));
    assert_eq!(records[1][0], "1111000000");
    assert_eq!(records[2], ["1111010100", "서울특별시 종로구 청운동", ""].map(String::from));
    assert_eq!(records[3][2], "폐지");
}

#[test]
fn written_table_loads_into_directory() {
    let mut csv = Vec::new();
    write_legal_codes(&mut csv, &records()).expect("write");
    assert!(csv.starts_with(UTF8_BOM));
    let text = String::from_utf8(csv[UTF8_BOM.len()..].to_vec()).expect("utf-8");
    assert_eq!(text.lines().next(), Some("법정동코드,법정동명,폐지여부"));

    let directory = LegalCodeDirectory::from_reader(csv.as_slice()).expect("parse");
    assert_eq!(directory.len(), 4);
    assert_eq!(
        directory.sido(),
        vec![AdministrativeRegion::new("11", "서울특별시")]
    );
    let matches = directory.search("옛동", 10);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].status, CodeStatus::Abolished);
}

#[test]
fn missing_workbook_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workbook = dir.path().join("missing.xlsx");
    let out = dir.path().join("data/legal_codes.csv");

    let err = extract_legal_codes(&workbook, &out).expect_err("missing workbook");
    assert!(format!("{err:#}").contains("missing.xlsx"));
    assert!(!out.exists());
}
