//! 조회 세션
//!
//! 검색 → 행 선택 → 매칭 → 묶음 → 내보내기. 요청 사이에 들고 있는 상태는 저장소 스냅샷뿐이다.

use crate::error::{Result, TmsError};
use crate::workbook::SourceRepository;
use tms_survey_common::export::excel_core::generate_workbook_buffer;
use tms_survey_common::{match_row, report, ExportBundle, ExportOptions, GuideRow, MatchResult, MatchRules};

/// 선택한 개선내역 1건의 조회 결과
#[derive(Debug, Clone)]
pub struct Inspection {
    pub row: GuideRow,
    pub matches: MatchResult,
    pub bundle: ExportBundle,
}

pub struct Session {
    repository: SourceRepository,
    rules: MatchRules,
}

impl Session {
    pub fn new(repository: SourceRepository, rules: MatchRules) -> Self {
        Self { repository, rules }
    }

    pub fn repository(&self) -> &SourceRepository {
        &self.repository
    }

    /// 개선내역 검색 (원본 순서)
    pub fn search(&self, keyword: &str) -> Vec<GuideRow> {
        let snapshot = self.repository.snapshot();
        snapshot.guide.search(keyword).into_iter().cloned().collect()
    }

    /// 개선내역 1건의 적용 시험과 조사표 시트
    pub fn inspect(&self, source_row: usize) -> Result<Inspection> {
        let snapshot = self.repository.snapshot();
        let row = snapshot
            .guide
            .row(source_row)
            .cloned()
            .ok_or_else(|| TmsError::NoMatchingItem(format!("{}행", source_row)))?;

        let matches = match_row(&snapshot.guide, &row, &snapshot.workbooks, &self.rules);
        let bundle = report::build(&row, &matches.matches);

        tracing::info!(
            row = source_row,
            description = %row.description,
            active = matches.matches.len(),
            missing = matches.missing().len(),
            sheets = bundle.entries.len(),
            "개선내역 조회"
        );

        Ok(Inspection { row, matches, bundle })
    }

    /// 조사표 xlsx 생성
    ///
    /// 묶음이 비어 있으면 None (다운로드를 내주지 않는다).
    pub fn export(&self, inspection: &Inspection, options: &ExportOptions) -> Result<Option<Vec<u8>>> {
        if inspection.bundle.is_empty() {
            tracing::info!(row = inspection.row.source_row, "내보낼 시트가 없습니다");
            return Ok(None);
        }

        let buffer = generate_workbook_buffer(&inspection.bundle, options)
            .map_err(|e| TmsError::ExcelGeneration(e.to_string()))?;
        Ok(Some(buffer))
    }
}
