//! 통합조사표 xlsx 출력 테스트
//!
//! 생성한 파일을 calamine으로 다시 읽어 내용이 묶음과 같은지 확인한다.

mod fixtures;

use fixtures::*;
use std::path::Path;
use tms_survey::scanner::{discover_sources, FileKeywords};
use tms_survey::workbook::{read_sheet_rows, sheet_names};
use tms_survey::{export, Inspection, LoadOptions, Session, SourceRepository};
use tms_survey_common::export::excel_core::{generate_workbook_buffer, COMBINED_SHEET_NAME, EMPTY_SHEET_NAME};
use tms_survey_common::{ExportBundle, ExportLayout, ExportOptions, MatchRules};

fn inspect(dir: &Path, keyword: &str) -> (Session, Inspection) {
    let files = discover_sources(dir, &FileKeywords::default()).unwrap();
    let repository = SourceRepository::open(files, LoadOptions::default()).unwrap();
    let session = Session::new(repository, MatchRules::default());
    let row = session.search(keyword)[0].source_row;
    let inspection = session.inspect(row).unwrap();
    (session, inspection)
}

fn save(dir: &Path, name: &str, buffer: &[u8]) -> std::path::PathBuf {
    export::write_workbook(buffer, &dir.join(name), "무시").unwrap()
}

#[test]
fn test_per_test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    let (session, inspection) = inspect(dir.path(), "측정기기");

    let buffer = session
        .export(&inspection, &ExportOptions::default())
        .unwrap()
        .unwrap();
    let path = save(dir.path(), "out.xlsx", &buffer);

    assert_eq!(
        sheet_names(&path).unwrap(),
        vec!["7. 측정기기-자료수집기", "8. 자료수집기-관제센터"]
    );

    for entry in &inspection.bundle.entries {
        let rows = read_sheet_rows(&path, &entry.label).unwrap();
        assert_eq!(rows.len(), entry.table.row_count() + 1);
        assert_eq!(rows[0], entry.tagged_headers());
        assert_eq!(rows[1..].to_vec(), entry.tagged_rows());
    }
}

#[test]
fn test_combined_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    let (session, inspection) = inspect(dir.path(), "유량계");

    let options = ExportOptions {
        layout: ExportLayout::Combined,
        include_summary: false,
    };
    let buffer = session.export(&inspection, &options).unwrap().unwrap();
    let path = save(dir.path(), "combined.xlsx", &buffer);

    assert_eq!(sheet_names(&path).unwrap(), vec![COMBINED_SHEET_NAME]);

    let rows = read_sheet_rows(&path, COMBINED_SHEET_NAME).unwrap();
    // 헤더 1행 + 유량계 점검 2행 + 결과서 1행
    assert_eq!(rows.len(), 1 + inspection.bundle.total_rows());
    assert_eq!(&rows[0][..3], &["구분", "시험항목", "원본시트"]);
    assert_eq!(&rows[1][..3], &["확인검사", "유량계 점검", "유량계 점검"]);
    assert_eq!(&rows[3][..3], &["상대정확도", "상대정확도", "결과서"]);
}

#[test]
fn test_summary_sheet_first() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    let (session, inspection) = inspect(dir.path(), "측정기기");

    let options = ExportOptions {
        layout: ExportLayout::PerTest,
        include_summary: true,
    };
    let buffer = session.export(&inspection, &options).unwrap().unwrap();
    let path = save(dir.path(), "summary.xlsx", &buffer);

    let names = sheet_names(&path).unwrap();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "요약");
}

#[test]
fn test_export_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    let (session, inspection) = inspect(dir.path(), "유량계");

    for layout in [ExportLayout::PerTest, ExportLayout::Combined] {
        let options = ExportOptions { layout, include_summary: true };
        let first = session.export(&inspection, &options).unwrap().unwrap();
        let second = session.export(&inspection, &options).unwrap().unwrap();
        assert_eq!(first, second, "{} 출력이 매번 다릅니다", layout);
    }
}

#[test]
fn test_scenario_d_empty_bundle() {
    let dir = tempfile::tempdir().unwrap();

    let buffer = generate_workbook_buffer(&ExportBundle::default(), &ExportOptions::default()).unwrap();
    let path = save(dir.path(), "empty.xlsx", &buffer);

    assert_eq!(sheet_names(&path).unwrap(), vec![EMPTY_SHEET_NAME]);
    let rows = read_sheet_rows(&path, EMPTY_SHEET_NAME).unwrap();
    assert!(rows.iter().all(|r| r.iter().all(|c| c.is_empty())));
}

#[test]
fn test_session_suppresses_empty_download() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());
    let (session, inspection) = inspect(dir.path(), "기타 변경");

    assert!(inspection.matches.matches.is_empty());
    assert!(session.export(&inspection, &ExportOptions::default()).unwrap().is_none());
}
