use crate::error::{Result, TmsError};
use crate::scanner::FileKeywords;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tms_survey_common::{ExportLayout, MatchRules};

/// 원본 폴더를 지정하는 환경변수
pub const DATA_DIR_ENV: &str = "TMS_SURVEY_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 가이드북·조사표가 있는 폴더
    pub data_dir: Option<PathBuf>,
    /// 가이드북 시트 이름 (없으면 자동 선택)
    pub guide_sheet: Option<String>,
    /// 가이드북 시험 항목 헤더 행 (없으면 자동 판별)
    pub header_row: Option<usize>,
    pub file_keywords: FileKeywords,
    pub export_layout: ExportLayout,
    pub matching: MatchRules,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 지정 경로에서 읽기 (파일이 없으면 기본값)
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TmsError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("tms-survey").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            data_dir: None,
            guide_sheet: None,
            header_row: None,
            file_keywords: FileKeywords::default(),
            export_layout: ExportLayout::PerTest,
            matching: MatchRules::default(),
        }
    }

    /// 원본 폴더 (CLI 인자 > 환경변수 > 설정 파일 > 현재 폴더)
    pub fn resolve_data_dir(&self, cli_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli_dir {
            return dir.to_path_buf();
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = Some(dir);
        self.save()
    }
}
