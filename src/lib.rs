//! TMS 개선내역별 통합조사표 생성 도구
//!
//! 원본 파일 탐색, 엑셀 읽기, 캐시, CLI. 해석·매칭 로직은 `tms_survey_common`.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod scanner;
pub mod selector;
pub mod session;
pub mod workbook;

pub use error::{Result, TmsError};
pub use session::{Inspection, Session};
pub use workbook::{LoadOptions, SourceRepository, SourceSnapshot};
