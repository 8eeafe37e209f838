use crate::error::Result;
use std::path::{Path, PathBuf};
use tms_survey_common::types::strip_whitespace;

/// 출력 파일 제목 (파일 이름에 못 쓰는 문자는 '_')
pub fn export_title(description: &str) -> String {
    let title: String = strip_whitespace(description)
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    if title.is_empty() {
        "통합조사표".to_string()
    } else {
        format!("통합조사표_{}", title)
    }
}

/// 디렉터리(또는 확장자 없는 경로)면 제목으로 파일 이름을 붙인다
pub fn output_path_for(output: &Path, title: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.xlsx", title))
    } else {
        output.to_path_buf()
    }
}

/// xlsx 바이트열을 파일로 저장
pub fn write_workbook(buffer: &[u8], output: &Path, title: &str) -> Result<PathBuf> {
    let path = output_path_for(output, title);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, buffer)?;
    tracing::info!(path = %path.display(), bytes = buffer.len(), "조사표 저장");
    Ok(path)
}
