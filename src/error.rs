use thiserror::Error;

#[derive(Error, Debug)]
pub enum TmsError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("파일을 찾을 수 없습니다: {0}")]
    FileNotFound(String),

    #[error("폴더를 찾을 수 없습니다: {0}")]
    FolderNotFound(String),

    #[error("시트를 찾을 수 없습니다: {path} ({sheet})")]
    SheetNotFound { path: String, sheet: String },

    #[error("워크북을 열 수 없습니다: {0}")]
    WorkbookOpen(String),

    #[error("가이드북 파일이 없습니다. 파일 이름에 '가이드' 또는 '개선내역'이 들어간 xlsx를 {0} 에 두세요")]
    NoGuideFound(String),

    #[error("'{0}'에 해당하는 개선내역을 찾을 수 없습니다")]
    NoMatchingItem(String),

    #[error("Excel 생성 오류: {0}")]
    ExcelGeneration(String),

    #[error("JSON 처리 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] tms_survey_common::Error),
}

pub type Result<T> = std::result::Result<T, TmsError>;
