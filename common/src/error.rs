//! 에러 타입 정의

use thiserror::Error;

/// 공통 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    #[error("필수 열이 없습니다: {0}")]
    MissingColumn(String),

    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;
