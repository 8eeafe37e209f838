//! 원본 데이터 캐시
//!
//! 가이드북과 조사표를 한 번 읽어 스냅샷으로 들고 있다가, 다시 읽기가 성공했을 때만 교체한다.

use super::{load_guide, load_result_workbook};
use crate::error::Result;
use crate::scanner::SourceFiles;
use std::sync::{Arc, RwLock};
use tms_survey_common::{GuideTable, Section, WorkbookSet};

/// 읽기 옵션
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub guide_sheet: Option<String>,
    pub header_row: Option<usize>,
}

/// 한 시점의 원본 데이터 (정규화된 가이드북 + 구분별 조사표)
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    pub guide: GuideTable,
    pub workbooks: WorkbookSet,
}

pub struct SourceRepository {
    files: SourceFiles,
    options: LoadOptions,
    current: RwLock<Arc<SourceSnapshot>>,
}

impl SourceRepository {
    /// 원본을 읽어 저장소 생성
    pub fn open(files: SourceFiles, options: LoadOptions) -> Result<Self> {
        let snapshot = load_snapshot(&files, &options)?;
        Ok(Self {
            files,
            options,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// 현재 스냅샷
    pub fn snapshot(&self) -> Arc<SourceSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// 원본 다시 읽기
    ///
    /// 실패하면 에러를 돌려주고 기존 스냅샷은 그대로 둔다.
    pub fn reload(&self) -> Result<Arc<SourceSnapshot>> {
        let fresh = Arc::new(load_snapshot(&self.files, &self.options)?);
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::clone(&fresh),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&fresh),
        }
        tracing::info!("원본 데이터 다시 읽기 완료");
        Ok(fresh)
    }
}

fn load_snapshot(files: &SourceFiles, options: &LoadOptions) -> Result<SourceSnapshot> {
    let mut guide = load_guide(&files.guide, options.guide_sheet.as_deref(), options.header_row)?;
    guide.normalize();

    let mut workbooks = WorkbookSet::default();
    for section in Section::ALL {
        match files.get(section) {
            Some(path) => workbooks.insert(load_result_workbook(path, section)?),
            None => tracing::warn!(section = %section, "조사표 파일이 없습니다"),
        }
    }

    Ok(SourceSnapshot { guide, workbooks })
}
