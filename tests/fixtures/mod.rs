//! 통합 테스트용 xlsx 픽스처

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

pub const GUIDE_FILE: &str = "개선내역에 따른 시험방법(가이드북).xlsx";
pub const INTEGRATED_FILE: &str = "통합시험 조사표.xlsx";
pub const VERIFICATION_FILE: &str = "확인검사 조사표.xlsx";
pub const RELATIVE_ACCURACY_FILE: &str = "상대정확도 결과서.xlsx";

pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<String>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, value).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// 가이드북 시트
///
/// 행 2: 측정기기 교체 (7, 8번 통합시험)
/// 행 3: 자료수집기 교체 (일반현황, 외관 및 구조)
/// 행 4: 유량계 교체 (유량계 점검, 상대정확도)
/// 행 5: 기타 변경 (체크 없음)
pub fn guide_rows() -> Vec<Vec<String>> {
    grid(&[
        &["", "", "", "통합시험", "", "", "확인검사", "", "상대정확도", ""],
        &[
            "순번",
            "분류",
            "개선내역",
            "1. 일반현황",
            "7. 측정기기-자료수집기",
            "8. 자료수집기-관제센터",
            "외관 및 구조",
            "유량계 점검",
            "상대정확도",
            "참고",
        ],
        &["1", "계측기 교체", "측정기기 교체", "", "ㅇ", "ㅇ", "", "", "", "S/N 확인"],
        &["2", "", "자료수집기 교체", "O", "", "", "O", "", "", ""],
        &["3", "구조 변경", "유량계 교체", "", "", "", "", "V", "V", ""],
        &["4", "", "기타 변경", "", "", "", "", "", "", ""],
    ])
}

/// 실제 가이드북 형태
///
/// 행 0: 제목, 행 1: 구분 라벨 (순번/분류/개선내역/상대정확도/참고는 세로 병합),
/// 행 2: 시험 항목명, 행 3~6: `guide_rows` 와 같은 개선내역.
pub fn titled_guide_rows() -> Vec<Vec<String>> {
    let mut rows = grid(&[
        &["개선내역에 따른 시험방법(2025 최종)"],
        &["순번", "분류", "개선내역", "통합시험", "", "", "확인검사", "", "상대정확도", "참고"],
        &[
            "",
            "",
            "",
            "1. 일반현황",
            "7. 측정기기-자료수집기",
            "8. 자료수집기-관제센터",
            "외관 및 구조",
            "유량계 점검",
            "",
            "",
        ],
    ]);
    rows.extend(guide_rows().into_iter().skip(2));
    rows
}

pub fn survey_sheet(extra: &str) -> Vec<Vec<String>> {
    grid(&[
        &["점검항목", "결과", "비고"],
        &["S/N", "적합", extra],
        &["설치일자", "2024-01-01", ""],
    ])
}

/// 가이드북과 세 조사표를 폴더에 생성
pub fn write_sources(dir: &Path) -> PathBuf {
    write_sources_with_guide(dir, guide_rows())
}

/// 가이드북 시트 내용을 지정해 생성
pub fn write_sources_with_guide(dir: &Path, guide: Vec<Vec<String>>) -> PathBuf {
    write_workbook(
        &dir.join(GUIDE_FILE),
        &[("표지", grid(&[&["TMS 개선내역 가이드북"]])), ("★가이드북", guide)],
    );
    write_workbook(
        &dir.join(INTEGRATED_FILE),
        &[
            ("1. 일반현황", survey_sheet("일반")),
            ("7. 측정기기-자료수집기", survey_sheet("측정기기")),
            ("8. 자료수집기-관제센터", survey_sheet("관제센터")),
        ],
    );
    write_workbook(&dir.join(VERIFICATION_FILE), &[("유량계 점검", survey_sheet("유량계"))]);
    write_workbook(
        &dir.join(RELATIVE_ACCURACY_FILE),
        &[("결과서", grid(&[&["항목", "판정"], &["상대정확도", "적합"]]))],
    );
    dir.to_path_buf()
}
