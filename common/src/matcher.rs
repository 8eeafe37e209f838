//! 시험 항목 열 ↔ 조사표 시트 매칭
//!
//! 가이드북 열 이름과 조사표 시트 이름을 문자열 포함 규칙으로 대응시킨다.
//!
//! ## 규칙 (순서대로, 결과가 나온 첫 규칙 채택)
//! 1. 공백 제거 후 한쪽이 다른 쪽을 포함
//! 2. 외관 및 구조 → 보조 키워드(구조, 시료, 승인 ...) 시트
//! 3. 유량 → 유량/누적 시트
//! 4. 상대정확도 → 상대정확도 워크북의 시트 전체

use crate::checkmark::is_checked;
use crate::guide::GuideTable;
use crate::types::{strip_whitespace, GuideRow, Section, TestColumn, WorkbookSet, WorksheetTable};
use serde::{Deserialize, Serialize};

/// 상대정확도 열의 시트 선택 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeAccuracyPolicy {
    /// 워크북의 모든 시트
    #[default]
    AllSheets,
    /// 첫 시트만
    FirstSheet,
}

/// 매칭 키워드 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// 구조 그룹 확장을 일으키는 열 이름 키워드
    pub structural_triggers: Vec<String>,
    /// 구조 그룹 확장 시 시트 이름 키워드
    pub auxiliary_keywords: Vec<String>,
    /// 유량 확장을 일으키는 열 이름 키워드
    pub flow_triggers: Vec<String>,
    /// 유량 확장 시 시트 이름 키워드
    pub flow_keywords: Vec<String>,
    pub relative_accuracy: RelativeAccuracyPolicy,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            structural_triggers: owned(&["외관및구조", "구조", "외관"]),
            auxiliary_keywords: owned(&["구조", "시료", "승인", "방법", "범위", "교정", "일자", "물질"]),
            flow_triggers: owned(&["유량"]),
            flow_keywords: owned(&["유량", "누적"]),
            relative_accuracy: RelativeAccuracyPolicy::AllSheets,
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// 매칭에 성공한 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRule {
    Substring,
    StructuralGroup,
    FlowMeasurement,
    RelativeAccuracy,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRule::Substring => write!(f, "이름 포함"),
            MatchRule::StructuralGroup => write!(f, "구조 그룹"),
            MatchRule::FlowMeasurement => write!(f, "유량"),
            MatchRule::RelativeAccuracy => write!(f, "상대정확도"),
        }
    }
}

/// 시험 열 1개의 매칭 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub column: TestColumn,
    pub rule: Option<MatchRule>,
    /// 워크북 순서의 매칭 시트
    pub sheets: Vec<WorksheetTable>,
}

impl ColumnMatch {
    pub fn is_found(&self) -> bool {
        !self.sheets.is_empty()
    }
}

/// 개선내역 1건의 매칭 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub source_row: usize,
    pub description: String,
    /// 활성 열 순서
    pub matches: Vec<ColumnMatch>,
}

impl MatchResult {
    /// 시트를 찾지 못한 열
    pub fn missing(&self) -> Vec<&TestColumn> {
        self.matches
            .iter()
            .filter(|m| !m.is_found())
            .map(|m| &m.column)
            .collect()
    }

    pub fn section(&self, section: Section) -> Vec<&ColumnMatch> {
        self.matches
            .iter()
            .filter(|m| m.column.section == section)
            .collect()
    }
}

/// 체크 표시가 있는 시험 열 (선언 순서 유지)
pub fn active_columns<'a>(table: &'a GuideTable, row: &GuideRow) -> Vec<&'a TestColumn> {
    table
        .columns()
        .iter()
        .filter(|column| is_checked(row.cell(column)))
        .collect()
}

/// 열에 대응하는 시트 이름 (없으면 빈 Vec)
pub fn resolve(column: &TestColumn, sheet_names: &[String], rules: &MatchRules) -> Vec<String> {
    resolve_with_rule(column, sheet_names, rules)
        .map(|(_, sheets)| sheets)
        .unwrap_or_default()
}

/// 열에 대응하는 시트 이름과 채택된 규칙
pub fn resolve_with_rule(
    column: &TestColumn,
    sheet_names: &[String],
    rules: &MatchRules,
) -> Option<(MatchRule, Vec<String>)> {
    let column_key = strip_whitespace(&column.name);

    let candidates = [
        MatchRule::Substring,
        MatchRule::StructuralGroup,
        MatchRule::FlowMeasurement,
        MatchRule::RelativeAccuracy,
    ];

    for rule in candidates {
        let sheets = apply_rule(rule, column, &column_key, sheet_names, rules);
        if !sheets.is_empty() {
            tracing::debug!(column = %column.name, rule = %rule, sheets = ?sheets, "시트 매칭");
            return Some((rule, sheets));
        }
    }

    tracing::debug!(column = %column.name, "매칭 시트 없음");
    None
}

fn apply_rule(
    rule: MatchRule,
    column: &TestColumn,
    column_key: &str,
    sheet_names: &[String],
    rules: &MatchRules,
) -> Vec<String> {
    match rule {
        MatchRule::Substring => {
            if column_key.is_empty() {
                return Vec::new();
            }
            select_sheets(sheet_names, |sheet| {
                !sheet.is_empty() && (sheet.contains(column_key) || column_key.contains(sheet))
            })
        }
        MatchRule::StructuralGroup => {
            if !contains_any(column_key, &rules.structural_triggers) {
                return Vec::new();
            }
            select_sheets(sheet_names, |sheet| contains_any(sheet, &rules.auxiliary_keywords))
        }
        MatchRule::FlowMeasurement => {
            if !contains_any(column_key, &rules.flow_triggers) {
                return Vec::new();
            }
            select_sheets(sheet_names, |sheet| contains_any(sheet, &rules.flow_keywords))
        }
        MatchRule::RelativeAccuracy => {
            if column.section != Section::RelativeAccuracy {
                return Vec::new();
            }
            match rules.relative_accuracy {
                RelativeAccuracyPolicy::AllSheets => select_sheets(sheet_names, |_| true),
                RelativeAccuracyPolicy::FirstSheet => {
                    sheet_names.first().cloned().into_iter().collect()
                }
            }
        }
    }
}

/// 공백 제거한 시트 이름으로 판정, 원래 이름을 워크북 순서·중복 없이 반환
fn select_sheets<F>(sheet_names: &[String], predicate: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let mut selected: Vec<String> = Vec::new();
    for name in sheet_names {
        if predicate(&strip_whitespace(name)) && !selected.contains(name) {
            selected.push(name.clone());
        }
    }
    selected
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| {
        let k = strip_whitespace(k);
        !k.is_empty() && text.contains(&k)
    })
}

/// 선택한 개선내역의 활성 열을 구분별 워크북에서 찾는다
pub fn match_row(
    table: &GuideTable,
    row: &GuideRow,
    workbooks: &WorkbookSet,
    rules: &MatchRules,
) -> MatchResult {
    let matches = active_columns(table, row)
        .into_iter()
        .map(|column| {
            let (rule, sheets) = match workbooks.get(column.section) {
                Some(workbook) => {
                    let names = workbook.sheet_names();
                    match resolve_with_rule(column, &names, rules) {
                        Some((rule, found)) => {
                            let tables = found
                                .iter()
                                .filter_map(|name| workbook.sheet(name).cloned())
                                .collect();
                            (Some(rule), tables)
                        }
                        None => (None, Vec::new()),
                    }
                }
                None => (None, Vec::new()),
            };
            ColumnMatch {
                column: column.clone(),
                rule,
                sheets,
            }
        })
        .collect();

    MatchResult {
        source_row: row.source_row,
        description: row.description.clone(),
        matches,
    }
}
