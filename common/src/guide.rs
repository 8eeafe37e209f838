//! 가이드북(개선내역에 따른 시험방법) 테이블
//!
//! 시트의 셀 텍스트를 받아 개선내역 행과 시험 항목 열로 나눈다.
//!
//! ## 헤더 구조
//! - 상단 행: 구분 라벨 (통합시험 / 확인검사 / 상대정확도, 가로 병합)
//! - 하단 행: 시험 항목명 (1. 일반현황, 외관 및 구조, ...)
//!
//! 구분 라벨이 없는 열은 열 이름 규칙으로만 구분을 정한다. 열 위치 오프셋은 쓰지 않는다.

use crate::error::{Error, Result};
use crate::types::{collapse_whitespace, strip_whitespace, GuideRow, Section, TestColumn};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 헤더 탐색 범위 (상단 N행)
pub const HEADER_SCAN_LIMIT: usize = 10;

/// 헤더를 찾지 못했을 때의 기본 행 (제목 1행 아래)
pub const DEFAULT_HEADER_ROW: usize = 1;

/// 헤더 행 판별 키워드
pub const HEADER_ANCHORS: [&str; 3] = ["개선내역", "순번", "분류"];

/// 분류가 비어 있는 선두 행에 채우는 값
pub const UNCATEGORIZED: &str = "미분류";

lazy_static::lazy_static! {
    static ref ORDINAL_PREFIX: Regex = Regex::new(r"^\s*\d+\s*\.").unwrap();
}

/// 헤더 행 조건: 키워드와 같은 셀이 있거나, 서로 다른 셀에 키워드가 2개 이상
///
/// "개선내역에 따른 시험방법(2025 최종)" 같은 제목 셀 하나로는 헤더가 되지 않는다.
fn is_header_row(row: &[String], anchors: &[&str]) -> bool {
    let cells: Vec<String> = row
        .iter()
        .map(|c| strip_whitespace(c))
        .filter(|c| !c.is_empty())
        .collect();

    if cells.iter().any(|c| anchors.iter().any(|a| c == a)) {
        return true;
    }

    let hits = anchors
        .iter()
        .filter(|a| cells.iter().any(|c| c.contains(*a)))
        .count();
    let anchor_cells = cells
        .iter()
        .filter(|c| anchors.iter().any(|a| c.contains(a)))
        .count();
    hits >= 2 && anchor_cells >= 2
}

/// 상단 N행 중 헤더 조건을 만족하는 첫 행
///
/// 찾지 못하면 `DEFAULT_HEADER_ROW` 를 돌려준다.
pub fn detect_header(rows: &[Vec<String>], anchors: &[&str]) -> usize {
    let found = rows
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|row| is_header_row(row, anchors));

    match found {
        Some(index) => index,
        None => {
            tracing::warn!(
                fallback = DEFAULT_HEADER_ROW,
                "가이드북 헤더를 찾지 못해 기본 행을 사용합니다"
            );
            DEFAULT_HEADER_ROW
        }
    }
}

/// 열 이름만으로 구분 추정
pub fn infer_section_from_name(name: &str) -> Section {
    if strip_whitespace(name).contains("상대정확도") {
        Section::RelativeAccuracy
    } else if ORDINAL_PREFIX.is_match(name) {
        Section::Integrated
    } else {
        Section::Verification
    }
}

/// 구분 라벨 셀인지 (통합시험/확인검사/상대정확도 그 자체)
fn is_section_label(cell: &str) -> bool {
    let stripped = strip_whitespace(cell);
    Section::ALL.iter().any(|s| stripped == s.label())
}

fn cell_text(row: &[String], col: Option<usize>) -> String {
    col.and_then(|c| row.get(c))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Category,
    Description,
    Remarks,
    Ignored,
    Test,
}

fn classify_header(header: &str) -> ColumnRole {
    let stripped = strip_whitespace(header);
    if stripped.is_empty() || stripped.starts_with("Unnamed") || stripped == "순번" {
        ColumnRole::Ignored
    } else if stripped.contains("개선내역") {
        ColumnRole::Description
    } else if stripped == "분류" {
        ColumnRole::Category
    } else if stripped == "참고" || stripped == "비고" {
        ColumnRole::Remarks
    } else {
        ColumnRole::Test
    }
}

/// 가이드북 테이블
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideTable {
    /// 시험 항목 열 (선언 순서)
    columns: Vec<TestColumn>,
    /// 개선내역 행 (원본 순서)
    rows: Vec<GuideRow>,
    /// 시험 항목명이 있는 헤더 행
    header_row: usize,
}

impl GuideTable {
    /// 셀 텍스트 2차원 배열에서 생성
    ///
    /// # Arguments
    /// * `rows` - 시트 전체 셀 (행 우선, 절대 좌표)
    /// * `header_row` - 시험 항목명 헤더 행. None이면 `detect_header` 로 판별
    pub fn from_rows(rows: Vec<Vec<String>>, header_row: Option<usize>) -> Result<Self> {
        let name_row = match header_row {
            Some(index) => index,
            None => {
                let detected = detect_header(&rows, &HEADER_ANCHORS);
                let labels_above = detected
                    .checked_sub(1)
                    .and_then(|i| rows.get(i))
                    .map(|row| row.iter().any(|c| Section::from_label(c).is_some()))
                    .unwrap_or(false);
                // 구분 라벨이 같은 행에 있으면 항목명은 다음 행
                let labels_here = rows
                    .get(detected)
                    .map(|row| row.iter().any(|c| is_section_label(c)))
                    .unwrap_or(false);
                if !labels_above && labels_here && detected + 1 < rows.len() {
                    detected + 1
                } else {
                    detected
                }
            }
        };

        let empty = Vec::new();
        let names = rows
            .get(name_row)
            .ok_or_else(|| Error::MissingColumn("개선내역".into()))?;
        let labels = name_row
            .checked_sub(1)
            .and_then(|i| rows.get(i))
            .unwrap_or(&empty);
        let width = names.len().max(labels.len());

        let mut columns = Vec::new();
        let mut category_col = None;
        let mut description_col = None;
        let mut remarks_col = None;
        let mut current_section: Option<Section> = None;

        for position in 0..width {
            let label = labels.get(position).map(|s| s.as_str()).unwrap_or("");
            let mut header = names.get(position).map(|s| s.as_str()).unwrap_or("");

            if !label.trim().is_empty() {
                current_section = Section::from_label(label);
                // 세로 병합된 열(순번/분류, 단일 열 구분)은 상단 행에만 이름이 있다
                if header.trim().is_empty() {
                    header = label;
                }
            }

            match classify_header(header) {
                ColumnRole::Category => {
                    category_col.get_or_insert(position);
                }
                ColumnRole::Description => {
                    description_col.get_or_insert(position);
                }
                ColumnRole::Remarks => {
                    remarks_col.get_or_insert(position);
                }
                ColumnRole::Ignored => {}
                ColumnRole::Test => {
                    let name = collapse_whitespace(header);
                    let section = current_section.unwrap_or_else(|| infer_section_from_name(&name));
                    columns.push(TestColumn {
                        position,
                        name,
                        raw_header: header.to_string(),
                        section,
                    });
                }
            }
        }

        let description_col =
            description_col.ok_or_else(|| Error::MissingColumn("개선내역".into()))?;

        let guide_rows = rows
            .iter()
            .enumerate()
            .skip(name_row + 1)
            .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()))
            .map(|(source_row, row)| {
                let remarks = Some(cell_text(row, remarks_col)).filter(|r| !r.is_empty());
                GuideRow {
                    source_row,
                    category: cell_text(row, category_col),
                    description: cell_text(row, Some(description_col)),
                    remarks,
                    cells: row.clone(),
                }
            })
            .collect();

        Ok(Self {
            columns,
            rows: guide_rows,
            header_row: name_row,
        })
    }

    /// 분류 열 빈 칸을 직전 값으로 채운다 (병합 셀 복원)
    pub fn normalize(&mut self) {
        let mut last: Option<String> = None;
        for row in &mut self.rows {
            let trimmed = row.category.trim();
            if trimmed.is_empty() {
                row.category = last.clone().unwrap_or_else(|| UNCATEGORIZED.to_string());
            } else {
                row.category = trimmed.to_string();
                last = Some(row.category.clone());
            }
        }
    }

    /// 개선내역에 키워드를 포함한 행 (대소문자 무시, 원본 순서)
    pub fn search(&self, keyword: &str) -> Vec<&GuideRow> {
        let keyword = keyword.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| row.description.to_lowercase().contains(&keyword))
            .collect()
    }

    pub fn columns(&self) -> &[TestColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[GuideRow] {
        &self.rows
    }

    /// 시트 행 번호로 조회
    pub fn row(&self, source_row: usize) -> Option<&GuideRow> {
        self.rows.iter().find(|r| r.source_row == source_row)
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }
}
