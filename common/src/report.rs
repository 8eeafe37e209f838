//! 조사표 묶음(ExportBundle) 조립
//!
//! 매칭 결과를 구분 순서(통합시험 → 확인검사 → 상대정확도)로 정렬하고,
//! 각 시트에 출처(구분, 시험항목, 원본시트)를 붙여 내보낼 수 있게 만든다.

use crate::matcher::ColumnMatch;
use crate::types::{GuideRow, Section, WorksheetTable};
use serde::{Deserialize, Serialize};

/// 출처 표시 열
pub const TAG_HEADERS: [&str; 3] = ["구분", "시험항목", "원본시트"];

/// 시트를 찾지 못한 시험 항목의 표시 문구
pub const SHEET_NOT_FOUND: &str = "시트를 찾을 수 없음";

/// 선택한 개선내역 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub category: String,
    pub description: String,
    pub remarks: Option<String>,
}

/// 묶음에 들어가는 시트 1장
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub section: Section,
    /// 가이드북 시험 항목명
    pub test_name: String,
    /// 원본 시트 이름
    pub label: String,
    pub table: WorksheetTable,
}

impl ExportEntry {
    /// 출처 열을 앞에 붙인 헤더
    pub fn tagged_headers(&self) -> Vec<String> {
        TAG_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.table.headers.iter().cloned())
            .collect()
    }

    /// 출처 열을 앞에 붙인 행
    pub fn tagged_rows(&self) -> Vec<Vec<String>> {
        self.table
            .rows
            .iter()
            .map(|row| {
                let mut tagged = self.tags();
                tagged.extend(row.iter().cloned());
                tagged
            })
            .collect()
    }

    pub fn tags(&self) -> Vec<String> {
        vec![
            self.section.label().to_string(),
            self.test_name.clone(),
            self.label.clone(),
        ]
    }
}

/// 시트를 찾지 못한 시험 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTest {
    pub section: Section,
    pub test_name: String,
}

/// 출력 워크북 1개 분량의 묶음
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub item: Option<ItemInfo>,
    pub entries: Vec<ExportEntry>,
    pub missing: Vec<MissingTest>,
}

impl ExportBundle {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 구분별 시트 (구분 순서 고정)
    pub fn section_entries(&self, section: Section) -> Vec<&ExportEntry> {
        self.entries.iter().filter(|e| e.section == section).collect()
    }

    pub fn total_rows(&self) -> usize {
        self.entries.iter().map(|e| e.table.row_count()).sum()
    }
}

/// 출력 형식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportLayout {
    /// 시험 항목별 시트
    #[default]
    PerTest,
    /// 시트 1장에 세로로 이어 붙임
    Combined,
}

impl std::str::FromStr for ExportLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per-test" | "pertest" | "sheets" => Ok(ExportLayout::PerTest),
            "combined" | "single" => Ok(ExportLayout::Combined),
            _ => Err(format!("Unknown layout: {}. Use per-test or combined", s)),
        }
    }
}

impl std::fmt::Display for ExportLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportLayout::PerTest => write!(f, "per-test"),
            ExportLayout::Combined => write!(f, "combined"),
        }
    }
}

/// 출력 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub layout: ExportLayout,
    /// 앞에 요약 시트 추가
    #[serde(default)]
    pub include_summary: bool,
}

/// 매칭 결과로 묶음 생성
///
/// 구분 순서 → 활성 열 순서 → 워크북 시트 순서로 정렬한다.
pub fn build(row: &GuideRow, matches: &[ColumnMatch]) -> ExportBundle {
    let mut bundle = ExportBundle {
        item: Some(ItemInfo {
            category: row.category.clone(),
            description: row.description.clone(),
            remarks: row.remarks.clone(),
        }),
        ..Default::default()
    };

    for section in Section::ALL {
        for m in matches.iter().filter(|m| m.column.section == section) {
            if !m.is_found() {
                bundle.missing.push(MissingTest {
                    section,
                    test_name: m.column.name.clone(),
                });
                continue;
            }

            for table in &m.sheets {
                bundle.entries.push(ExportEntry {
                    section,
                    test_name: m.column.name.clone(),
                    label: table.name.clone(),
                    table: table.clone(),
                });
            }
        }
    }

    tracing::debug!(
        entries = bundle.entries.len(),
        missing = bundle.missing.len(),
        "조사표 묶음 생성"
    );
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchRule;
    use crate::types::TestColumn;

    fn guide_row() -> GuideRow {
        GuideRow {
            source_row: 3,
            category: "계측기 교체".into(),
            description: "측정기기 교체".into(),
            remarks: Some("S/N 확인".into()),
            cells: vec![],
        }
    }

    fn column_match(name: &str, section: Section, sheets: &[&str]) -> ColumnMatch {
        ColumnMatch {
            column: TestColumn {
                position: 0,
                name: name.into(),
                raw_header: name.into(),
                section,
            },
            rule: if sheets.is_empty() { None } else { Some(MatchRule::Substring) },
            sheets: sheets
                .iter()
                .map(|s| {
                    WorksheetTable::new(
                        *s,
                        vec!["점검항목".into(), "결과".into()],
                        vec![vec!["S/N".into(), "적합".into()]],
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_orders_by_section() {
        let matches = vec![
            column_match("상대정확도", Section::RelativeAccuracy, &["결과서"]),
            column_match("외관 및 구조", Section::Verification, &["시료채취 방법", "교정 일자"]),
            column_match("7. 측정기기-자료수집기", Section::Integrated, &["7. 측정기기-자료수집기"]),
        ];
        let bundle = build(&guide_row(), &matches);

        let labels: Vec<_> = bundle.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["7. 측정기기-자료수집기", "시료채취 방법", "교정 일자", "결과서"]
        );
        assert_eq!(bundle.entries[1].test_name, "외관 및 구조");
        assert_eq!(bundle.total_rows(), 4);
    }

    #[test]
    fn test_build_records_missing() {
        let matches = vec![
            column_match("1. 일반현황", Section::Integrated, &["1. 일반현황"]),
            column_match("외관 및 구조", Section::Verification, &[]),
        ];
        let bundle = build(&guide_row(), &matches);
        assert_eq!(bundle.entries.len(), 1);
        assert_eq!(
            bundle.missing,
            vec![MissingTest {
                section: Section::Verification,
                test_name: "외관 및 구조".into(),
            }]
        );
    }

    #[test]
    fn test_build_empty() {
        let bundle = build(&guide_row(), &[]);
        assert!(bundle.is_empty());
        assert_eq!(bundle.item.unwrap().description, "측정기기 교체");
    }

    #[test]
    fn test_tagged_rows() {
        let bundle = build(
            &guide_row(),
            &[column_match("1. 일반현황", Section::Integrated, &["일반현황"])],
        );
        let entry = &bundle.entries[0];
        assert_eq!(entry.tagged_headers(), vec!["구분", "시험항목", "원본시트", "점검항목", "결과"]);
        assert_eq!(
            entry.tagged_rows(),
            vec![vec!["통합시험", "1. 일반현황", "일반현황", "S/N", "적합"]]
        );
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("combined".parse::<ExportLayout>().unwrap(), ExportLayout::Combined);
        assert_eq!("PER-TEST".parse::<ExportLayout>().unwrap(), ExportLayout::PerTest);
        assert!("pdf".parse::<ExportLayout>().is_err());
    }
}
