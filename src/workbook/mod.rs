//! 엑셀 읽기 (calamine)
//!
//! 셀은 모두 텍스트로 바꿔 다룬다. 체크 표시 판별과 시트 이름 매칭이 문자열 기준이기 때문.

pub mod repository;

pub use repository::{LoadOptions, SourceRepository, SourceSnapshot};

use crate::error::{Result, TmsError};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tms_survey_common::{GuideTable, ResultWorkbook, Section, WorksheetTable};

/// 셀 값을 텍스트로
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // 정수값은 소수점 없이
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Range를 절대 좌표의 텍스트 2차원 배열로
///
/// calamine의 Range는 첫 데이터 셀부터 시작하므로 앞쪽 빈 행·열을 채운다.
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }
    rows
}

/// 시트 이름 목록
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(TmsError::FileNotFound(path.display().to_string()));
    }
    let workbook = open_workbook_auto(path)
        .map_err(|e| TmsError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;
    Ok(workbook.sheet_names().to_vec())
}

/// 시트 1장을 텍스트 2차원 배열로 읽기
pub fn read_sheet_rows(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(TmsError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| TmsError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;

    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(TmsError::SheetNotFound {
            path: path.display().to_string(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| TmsError::WorkbookOpen(format!("{} ({}): {}", path.display(), sheet, e)))?;
    Ok(range_to_rows(&range))
}

/// 가이드북 시트 기본 선택 ('가이드북'이 들어간 첫 시트, 없으면 첫 시트)
fn default_guide_sheet(names: &[String]) -> Option<String> {
    names
        .iter()
        .find(|n| n.contains("가이드북"))
        .or_else(|| names.first())
        .cloned()
}

/// 가이드북 읽기 (정규화 전)
///
/// # Arguments
/// * `sheet_name` - None이면 자동 선택
/// * `header_row` - 시험 항목명 헤더 행. None이면 자동 판별
pub fn load_guide(path: &Path, sheet_name: Option<&str>, header_row: Option<usize>) -> Result<GuideTable> {
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => {
            let names = sheet_names(path)?;
            default_guide_sheet(&names).ok_or_else(|| TmsError::SheetNotFound {
                path: path.display().to_string(),
                sheet: "가이드북".into(),
            })?
        }
    };

    let rows = read_sheet_rows(path, &sheet)?;
    let table = GuideTable::from_rows(rows, header_row)?;
    tracing::info!(
        path = %path.display(),
        sheet = %sheet,
        rows = table.rows().len(),
        columns = table.columns().len(),
        "가이드북 로드"
    );
    Ok(table)
}

/// 텍스트 배열을 조사표 시트로 (첫 행 = 헤더)
pub fn rows_to_table(name: &str, rows: Vec<Vec<String>>) -> WorksheetTable {
    let mut rows = rows.into_iter().skip_while(|r| r.iter().all(|c| c.trim().is_empty()));

    let headers: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim().to_string();
            if h.is_empty() {
                format!("열{}", i + 1)
            } else {
                h
            }
        })
        .collect();

    let mut body: Vec<Vec<String>> = rows.collect();
    while body
        .last()
        .map(|r| r.iter().all(|c| c.trim().is_empty()))
        .unwrap_or(false)
    {
        body.pop();
    }

    WorksheetTable::new(name, headers, body)
}

/// 엑셀 시트 1장 미리보기 (첫 행 = 헤더)
///
/// `sheet` 가 None이면 첫 시트.
pub fn preview_sheet(path: &Path, sheet: Option<&str>) -> Result<WorksheetTable> {
    let sheet = match sheet {
        Some(name) => name.to_string(),
        None => sheet_names(path)?
            .into_iter()
            .next()
            .ok_or_else(|| TmsError::SheetNotFound {
                path: path.display().to_string(),
                sheet: "(첫 시트)".into(),
            })?,
    };
    let rows = read_sheet_rows(path, &sheet)?;
    Ok(rows_to_table(&sheet, rows))
}

/// 구분별 조사표 워크북 읽기 (시트 순서 유지)
pub fn load_result_workbook(path: &Path, section: Section) -> Result<ResultWorkbook> {
    if !path.exists() {
        return Err(TmsError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| TmsError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;

    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in &names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| TmsError::WorkbookOpen(format!("{} ({}): {}", path.display(), name, e)))?;
        sheets.push(rows_to_table(name, range_to_rows(&range)));
    }

    tracing::info!(
        section = %section,
        path = %path.display(),
        sheets = sheets.len(),
        "조사표 로드"
    );

    Ok(ResultWorkbook {
        section,
        path: path.to_path_buf(),
        sheets,
    })
}
