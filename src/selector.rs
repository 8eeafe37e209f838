//! 검색 결과 중 개선내역 선택

use crate::error::{Result, TmsError};
use dialoguer::Select;
use std::io::IsTerminal;
use tms_survey_common::GuideRow;

/// 선택 항목 표시 문자열
pub fn row_label(row: &GuideRow) -> String {
    format!("[{}] {}", row.category, row.description)
}

/// 번호(1부터)로 선택
pub fn select_by_index(rows: &[GuideRow], index: usize) -> Result<&GuideRow> {
    index
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .ok_or_else(|| TmsError::NoMatchingItem(format!("{}번 (검색 결과 {}건)", index, rows.len())))
}

/// 검색 결과에서 1건 선택
///
/// 1건이면 그대로, 여러 건이면 대화형 선택. 터미널이 아니면 첫 번째 행.
pub fn select_row<'a>(rows: &'a [GuideRow], index: Option<usize>, keyword: &str) -> Result<&'a GuideRow> {
    if rows.is_empty() {
        return Err(TmsError::NoMatchingItem(keyword.to_string()));
    }
    if let Some(index) = index {
        return select_by_index(rows, index);
    }
    if rows.len() == 1 || !std::io::stdin().is_terminal() {
        return Ok(&rows[0]);
    }

    let labels: Vec<String> = rows.iter().map(row_label).collect();
    let choice = Select::new()
        .with_prompt(format!("'{}' 검색 결과 {}건 중 선택", keyword, rows.len()))
        .items(&labels)
        .default(0)
        .interact_opt();

    match choice {
        Ok(Some(i)) => Ok(&rows[i]),
        Ok(None) => Err(TmsError::NoMatchingItem(keyword.to_string())),
        Err(e) => {
            tracing::warn!(error = %e, "선택 입력 실패, 첫 번째 행 사용");
            Ok(&rows[0])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<GuideRow> {
        ["측정기기 교체", "자료수집기 교체"]
            .iter()
            .enumerate()
            .map(|(i, d)| GuideRow {
                source_row: i + 3,
                category: "계측기 교체".into(),
                description: d.to_string(),
                remarks: None,
                cells: vec![],
            })
            .collect()
    }

    #[test]
    fn test_select_by_index() {
        let rows = rows();
        assert_eq!(select_by_index(&rows, 2).unwrap().description, "자료수집기 교체");
        assert!(select_by_index(&rows, 0).is_err());
        assert!(select_by_index(&rows, 3).is_err());
    }

    #[test]
    fn test_select_row_empty() {
        let result = select_row(&[], None, "없음");
        assert!(matches!(result, Err(TmsError::NoMatchingItem(_))));
    }

    #[test]
    fn test_row_label() {
        assert_eq!(row_label(&rows()[0]), "[계측기 교체] 측정기기 교체");
    }
}
