//! 원본 파일 탐색
//!
//! 폴더 안의 엑셀 파일 이름에 들어간 키워드로 가이드북과 구분별 조사표를 찾는다.

use crate::error::{Result, TmsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tms_survey_common::Section;
use walkdir::WalkDir;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls"];

/// 파일 이름 키워드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileKeywords {
    pub guide: Vec<String>,
    pub integrated: Vec<String>,
    pub verification: Vec<String>,
    pub relative_accuracy: Vec<String>,
}

impl Default for FileKeywords {
    fn default() -> Self {
        Self {
            guide: vec!["가이드".into(), "개선내역".into()],
            integrated: vec!["통합".into()],
            verification: vec!["확인".into()],
            relative_accuracy: vec!["상대정확도".into()],
        }
    }
}

impl FileKeywords {
    fn for_section(&self, section: Section) -> &[String] {
        match section {
            Section::Integrated => &self.integrated,
            Section::Verification => &self.verification,
            Section::RelativeAccuracy => &self.relative_accuracy,
        }
    }
}

/// 탐색된 원본 파일
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFiles {
    pub guide: PathBuf,
    pub integrated: Option<PathBuf>,
    pub verification: Option<PathBuf>,
    pub relative_accuracy: Option<PathBuf>,
}

impl SourceFiles {
    pub fn get(&self, section: Section) -> Option<&Path> {
        match section {
            Section::Integrated => self.integrated.as_deref(),
            Section::Verification => self.verification.as_deref(),
            Section::RelativeAccuracy => self.relative_accuracy.as_deref(),
        }
    }

    fn set(&mut self, section: Section, path: PathBuf) {
        match section {
            Section::Integrated => self.integrated = Some(path),
            Section::Verification => self.verification = Some(path),
            Section::RelativeAccuracy => self.relative_accuracy = Some(path),
        }
    }
}

fn is_workbook(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with("~$"))
        .unwrap_or(false);
    if is_lock_file {
        return false;
    }

    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            WORKBOOK_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn name_matches(path: &Path, keywords: &[String]) -> bool {
    let name = file_name(path);
    keywords.iter().any(|k| !k.is_empty() && name.contains(k.as_str()))
}

/// 폴더 직하의 엑셀 파일 (이름순)
pub fn list_workbooks(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(TmsError::FolderNotFound(folder.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_workbook(p))
        .collect();

    files.sort_by_key(|p| file_name(p));
    Ok(files)
}

/// 가이드북과 구분별 조사표 탐색
///
/// 조사표는 없어도 되지만 가이드북이 없으면 에러.
pub fn discover_sources(folder: &Path, keywords: &FileKeywords) -> Result<SourceFiles> {
    let files = list_workbooks(folder)?;

    let guide = files
        .iter()
        .find(|p| name_matches(p, &keywords.guide))
        .cloned()
        .ok_or_else(|| TmsError::NoGuideFound(folder.display().to_string()))?;

    let mut sources = SourceFiles {
        guide: guide.clone(),
        integrated: None,
        verification: None,
        relative_accuracy: None,
    };

    let mut taken = vec![guide];
    for section in [Section::RelativeAccuracy, Section::Verification, Section::Integrated] {
        let found = files
            .iter()
            .find(|p| !taken.contains(p) && name_matches(p, keywords.for_section(section)))
            .cloned();
        if let Some(path) = found {
            tracing::debug!(section = %section, path = %path.display(), "조사표 파일 발견");
            taken.push(path.clone());
            sources.set(section, path);
        }
    }

    Ok(sources)
}
