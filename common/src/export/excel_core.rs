//! Excel 생성 (공통 라이브러리)
//!
//! ExportBundle을 rust_xlsxwriter로 직렬화한다.
//! - per-test: 시험 항목(시트)마다 워크시트 1장
//! - combined: 모든 행을 워크시트 1장에 세로로 이어 붙임
//!
//! 같은 묶음이면 항상 같은 바이트열이 나오도록 문서 생성 시각을 고정한다.

use crate::error::{Error, Result};
use crate::report::{
    ExportBundle, ExportEntry, ExportLayout, ExportOptions, SHEET_NOT_FOUND, TAG_HEADERS,
};
use crate::types::Section;
use regex::Regex;
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::collections::{HashMap, HashSet};

/// 워크시트 이름 최대 길이 (문자 수)
pub const MAX_SHEET_NAME_CHARS: usize = 31;

pub const COMBINED_SHEET_NAME: &str = "통합조사표";
pub const SUMMARY_SHEET_NAME: &str = "요약";
/// 묶음이 비었을 때의 빈 시트
pub const EMPTY_SHEET_NAME: &str = "조사표";

lazy_static::lazy_static! {
    static ref SHEET_NAME_DISALLOWED: Regex = Regex::new(r"[^\p{L}\p{N} ._\-]").unwrap();
}

fn xlsx_error(context: &'static str) -> impl Fn(XlsxError) -> Error {
    move |e| Error::Excel(format!("{}: {}", context, e))
}

/// 워크시트 이름 정리 (허용 문자만 남기고 31자로 자름)
///
/// 정리 후 비면 `Sheet{index}` 를 쓴다.
pub fn sanitize_sheet_name(name: &str, index: usize) -> String {
    let cleaned = SHEET_NAME_DISALLOWED.replace_all(name, "");
    let truncated: String = cleaned.trim().chars().take(MAX_SHEET_NAME_CHARS).collect();
    let truncated = truncated.trim_end().to_string();

    if truncated.is_empty() {
        format!("Sheet{}", index)
    } else {
        truncated
    }
}

/// 대소문자 무시로 겹치지 않는 이름 (`_2`, `_3` ... 접미사)
fn unique_sheet_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_lowercase()) {
        return base.to_string();
    }

    let mut n = 2;
    loop {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
        let candidate: String = base.chars().take(keep).collect::<String>() + &suffix;
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| Error::Excel(format!("열 수 초과: {}", col)))
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| Error::Excel(format!("행 수 초과: {}", row)))
}

/// 1행 쓰기 (빈 문자열은 건너뜀)
fn write_row(
    worksheet: &mut Worksheet,
    row: usize,
    values: &[String],
    format: Option<&Format>,
) -> Result<()> {
    let row = row_index(row)?;
    for (col, value) in values.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        let col = column_index(col)?;
        match format {
            Some(format) => worksheet
                .write_string_with_format(row, col, value, format)
                .map_err(xlsx_error("셀 쓰기 오류"))?,
            None => worksheet
                .write_string(row, col, value)
                .map_err(xlsx_error("셀 쓰기 오류"))?,
        };
    }
    Ok(())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA))
}

/// 묶음을 xlsx 바이트열로 생성
///
/// 빈 묶음이어도 에러 없이 빈 시트 1장짜리 워크북을 돌려준다.
pub fn generate_workbook_buffer(bundle: &ExportBundle, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let created = ExcelDateTime::from_ymd(2000, 1, 1).map_err(xlsx_error("문서 속성 오류"))?;
    let properties = DocProperties::new()
        .set_title("통합조사표")
        .set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let header = header_format();
    let mut used_names = HashSet::new();

    if options.include_summary {
        used_names.insert(SUMMARY_SHEET_NAME.to_lowercase());
        write_summary(&mut workbook, bundle, &header)?;
    }

    if bundle.is_empty() {
        if !options.include_summary {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(EMPTY_SHEET_NAME)
                .map_err(xlsx_error("시트 이름 설정 오류"))?;
        }
    } else {
        match options.layout {
            ExportLayout::PerTest => {
                write_per_test(&mut workbook, &bundle.entries, &header, &mut used_names)?
            }
            ExportLayout::Combined => write_combined(&mut workbook, &bundle.entries, &header)?,
        }
    }

    workbook
        .save_to_buffer()
        .map_err(xlsx_error("Excel 저장 오류"))
}

fn write_per_test(
    workbook: &mut Workbook,
    entries: &[ExportEntry],
    header: &Format,
    used_names: &mut HashSet<String>,
) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        let base = sanitize_sheet_name(&entry.label, i + 1);
        let name = unique_sheet_name(&base, used_names);

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&name)
            .map_err(xlsx_error("시트 이름 설정 오류"))?;

        write_row(worksheet, 0, &entry.tagged_headers(), Some(header))?;
        for (r, row) in entry.tagged_rows().iter().enumerate() {
            write_row(worksheet, r + 1, row, None)?;
        }
    }
    Ok(())
}

/// 헤더 합집합 (등장 순서, 같은 이름이 여러 번 나오면 순번으로 구분)
fn union_headers(entries: &[ExportEntry]) -> (Vec<String>, HashMap<(String, usize), usize>) {
    let mut headers = Vec::new();
    let mut positions = HashMap::new();

    for entry in entries {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for h in &entry.table.headers {
            let occurrence = seen.entry(h.as_str()).or_insert(0);
            let key = (h.clone(), *occurrence);
            *occurrence += 1;
            if !positions.contains_key(&key) {
                positions.insert(key, headers.len());
                headers.push(h.clone());
            }
        }
    }

    (headers, positions)
}

fn write_combined(workbook: &mut Workbook, entries: &[ExportEntry], header: &Format) -> Result<()> {
    let (union, positions) = union_headers(entries);
    let offset = TAG_HEADERS.len();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(COMBINED_SHEET_NAME)
        .map_err(xlsx_error("시트 이름 설정 오류"))?;

    let header_row: Vec<String> = TAG_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(union.iter().cloned())
        .collect();
    write_row(worksheet, 0, &header_row, Some(header))?;

    let mut current = 1;
    for entry in entries {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let targets: Vec<usize> = entry
            .table
            .headers
            .iter()
            .map(|h| {
                let occurrence = seen.entry(h.as_str()).or_insert(0);
                let key = (h.clone(), *occurrence);
                *occurrence += 1;
                positions.get(&key).copied().unwrap_or_default() + offset
            })
            .collect();

        for row in &entry.table.rows {
            let mut line = vec![String::new(); header_row.len()];
            for (i, tag) in entry.tags().into_iter().enumerate() {
                line[i] = tag;
            }
            for (col, value) in row.iter().enumerate() {
                if let Some(&target) = targets.get(col) {
                    line[target] = value.clone();
                }
            }
            write_row(worksheet, current, &line, None)?;
            current += 1;
        }
    }
    Ok(())
}

fn write_summary(workbook: &mut Workbook, bundle: &ExportBundle, header: &Format) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SUMMARY_SHEET_NAME)
        .map_err(xlsx_error("시트 이름 설정 오류"))?;

    let mut current = 0;
    if let Some(item) = &bundle.item {
        let info = [
            ("분류", item.category.clone()),
            ("개선내역", item.description.clone()),
            ("비고", item.remarks.clone().unwrap_or_else(|| "-".into())),
        ];
        for (label, value) in info {
            write_row(worksheet, current, &[label.to_string()], Some(header))?;
            write_row(worksheet, current, &[String::new(), value], None)?;
            current += 1;
        }
        current += 1;
    }

    let columns = ["구분", "시험항목", "조사표 시트"].map(String::from);
    write_row(worksheet, current, &columns, Some(header))?;
    current += 1;

    for section in Section::ALL {
        let mut tests: Vec<(&str, Vec<&str>)> = Vec::new();
        for entry in bundle.section_entries(section) {
            match tests.iter_mut().find(|(name, _)| *name == entry.test_name) {
                Some((_, labels)) => labels.push(entry.label.as_str()),
                None => tests.push((entry.test_name.as_str(), vec![entry.label.as_str()])),
            }
        }

        for (name, labels) in tests {
            let line = [section.label().to_string(), name.to_string(), labels.join(", ")];
            write_row(worksheet, current, &line, None)?;
            current += 1;
        }

        for missing in bundle.missing.iter().filter(|m| m.section == section) {
            let line = [
                section.label().to_string(),
                missing.test_name.clone(),
                SHEET_NOT_FOUND.to_string(),
            ];
            write_row(worksheet, current, &line, None)?;
            current += 1;
        }
    }
    Ok(())
}
