//! 조사표 파이프라인 공유 타입
//!
//! CLI와 다른 프런트엔드가 함께 쓰는 타입:
//! - Section: 통합시험 / 확인검사 / 상대정확도
//! - TestColumn / GuideRow: 가이드북의 열과 개선내역 행
//! - WorksheetTable / ResultWorkbook / WorkbookSet: 조사표 워크북

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 시험 구분 (가이드북 상단 헤더의 대분류)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    /// 통합시험
    Integrated,
    /// 확인검사
    Verification,
    /// 상대정확도
    RelativeAccuracy,
}

impl Section {
    /// 출력 순서가 고정된 전체 구분
    pub const ALL: [Section; 3] = [
        Section::Integrated,
        Section::Verification,
        Section::RelativeAccuracy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Integrated => "통합시험",
            Section::Verification => "확인검사",
            Section::RelativeAccuracy => "상대정확도",
        }
    }

    /// 헤더 라벨에서 구분을 판별
    pub fn from_label(text: &str) -> Option<Self> {
        let stripped = strip_whitespace(text);
        // "상대정확도 확인" 같은 라벨이 있어 상대정확도를 먼저 본다
        if stripped.contains("상대") || stripped.contains("정확도") {
            Some(Section::RelativeAccuracy)
        } else if stripped.contains("통합") {
            Some(Section::Integrated)
        } else if stripped.contains("확인") {
            Some(Section::Verification)
        } else {
            None
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 가이드북의 시험 항목 열
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestColumn {
    /// 시트 내 열 위치 (0부터)
    pub position: usize,
    /// 표시용 이름 (공백·줄바꿈 정리)
    pub name: String,
    /// 원본 헤더 텍스트
    pub raw_header: String,
    pub section: Section,
}

/// 개선내역 1건
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideRow {
    /// 시트 내 행 위치 (0부터)
    pub source_row: usize,
    /// 분류 (정규화 후 빈 값 없음)
    pub category: String,
    /// 개선내역
    pub description: String,
    /// 참고/비고
    #[serde(default)]
    pub remarks: Option<String>,
    /// 열 위치로 접근하는 원본 셀 값
    pub cells: Vec<String>,
}

impl GuideRow {
    /// 시험 열의 셀 값 (빈 셀은 None)
    pub fn cell(&self, column: &TestColumn) -> Option<&str> {
        self.cells
            .get(column.position)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// 조사표 워크시트 1장
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WorksheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// 구분별 조사표 워크북
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultWorkbook {
    pub section: Section,
    pub path: PathBuf,
    /// 워크북 내 순서 유지
    pub sheets: Vec<WorksheetTable>,
}

impl ResultWorkbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&WorksheetTable> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// 세 구분의 조사표 워크북 묶음 (없는 워크북은 None)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookSet {
    pub integrated: Option<ResultWorkbook>,
    pub verification: Option<ResultWorkbook>,
    pub relative_accuracy: Option<ResultWorkbook>,
}

impl WorkbookSet {
    pub fn get(&self, section: Section) -> Option<&ResultWorkbook> {
        match section {
            Section::Integrated => self.integrated.as_ref(),
            Section::Verification => self.verification.as_ref(),
            Section::RelativeAccuracy => self.relative_accuracy.as_ref(),
        }
    }

    pub fn insert(&mut self, workbook: ResultWorkbook) {
        match workbook.section {
            Section::Integrated => self.integrated = Some(workbook),
            Section::Verification => self.verification = Some(workbook),
            Section::RelativeAccuracy => self.relative_accuracy = Some(workbook),
        }
    }
}

/// 모든 공백 문자 제거
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 공백·줄바꿈 연속을 공백 하나로 정리
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_from_label() {
        assert_eq!(Section::from_label("통합시험"), Some(Section::Integrated));
        assert_eq!(Section::from_label("확인 검사"), Some(Section::Verification));
        assert_eq!(Section::from_label("상대정확도"), Some(Section::RelativeAccuracy));
        assert_eq!(Section::from_label("상대정확도 확인"), Some(Section::RelativeAccuracy));
        assert_eq!(Section::from_label("개선내역에 따른 시험방법"), None);
    }

    #[test]
    fn test_section_order() {
        let labels: Vec<_> = Section::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["통합시험", "확인검사", "상대정확도"]);
    }

    #[test]
    fn test_guide_row_cell_blank_is_none() {
        let column = TestColumn {
            position: 1,
            name: "1. 일반현황".into(),
            raw_header: "1. 일반현황".into(),
            section: Section::Integrated,
        };
        let mut row = GuideRow {
            source_row: 2,
            category: "계측기 교체".into(),
            description: "측정기기 교체".into(),
            remarks: None,
            cells: vec!["1".into(), "  ".into()],
        };
        assert_eq!(row.cell(&column), None);

        row.cells[1] = "ㅇ".into();
        assert_eq!(row.cell(&column), Some("ㅇ"));
    }

    #[test]
    fn test_whitespace_helpers() {
        assert_eq!(strip_whitespace("3. 소프트웨어 \n기능 규격"), "3.소프트웨어기능규격");
        assert_eq!(collapse_whitespace("3. 소프트웨어 \n기능 규격"), "3. 소프트웨어 기능 규격");
    }

    #[test]
    fn test_workbook_set_get() {
        let mut set = WorkbookSet::default();
        assert!(set.get(Section::Verification).is_none());

        set.insert(ResultWorkbook {
            section: Section::Verification,
            path: PathBuf::from("확인검사 조사표.xlsx"),
            sheets: vec![WorksheetTable::new("외관 및 구조", vec![], vec![])],
        });
        let wb = set.get(Section::Verification).unwrap();
        assert_eq!(wb.sheet_names(), vec!["외관 및 구조".to_string()]);
    }
}
