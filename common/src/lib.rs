//! TMS 통합조사표 공통 라이브러리
//!
//! 가이드북 해석, 체크 표시 판별, 시트 매칭, 조사표 묶음 조립을 담당한다.
//! 파일 입출력은 하지 않는다 (xlsx 직렬화는 `excel` 기능).

pub mod types;
pub mod error;
pub mod checkmark;
pub mod guide;
pub mod matcher;
pub mod report;
pub mod export;

pub use types::{GuideRow, ResultWorkbook, Section, TestColumn, WorkbookSet, WorksheetTable};
pub use error::{Error, Result};
pub use checkmark::{is_checked, CHECK_MARKERS};
pub use guide::{detect_header, GuideTable};
pub use matcher::{
    active_columns, match_row, resolve, ColumnMatch, MatchResult, MatchRule, MatchRules,
    RelativeAccuracyPolicy,
};
pub use report::{build, ExportBundle, ExportEntry, ExportLayout, ExportOptions, ItemInfo, MissingTest};
