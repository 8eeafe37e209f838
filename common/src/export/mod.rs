//! 출력 코어 (CLI 등 프런트엔드 공용)

#[cfg(feature = "excel")]
pub mod excel_core;
