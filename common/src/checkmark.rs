//! 체크 표시 판별
//!
//! 가이드북 셀에 수기로 적힌 표시(ㅇ, O, ○, 대상 등)를 "시험 대상" 여부로 판별한다.
//! 의미 해석이 아닌 포함 여부 검사이므로 자유 텍스트 속 "V" 같은 오탐은 허용한다.

/// 시험 대상을 뜻하는 표시 목록 (대문자 기준)
pub const CHECK_MARKERS: [&str; 8] = ["O", "○", "오", "ㅇ", "V", "◎", "대상", "CHECK"];

/// 셀 값이 시험 대상 표시를 포함하는지 판별
pub fn is_checked(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };

    let normalized = value.trim().to_uppercase();
    if normalized.is_empty() {
        return false;
    }

    CHECK_MARKERS.iter().any(|marker| normalized.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_marker_is_checked() {
        for marker in CHECK_MARKERS {
            assert!(is_checked(Some(marker)), "{} 표시가 판별되지 않음", marker);
            assert!(is_checked(Some(&format!("  {}\n", marker))));
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_checked(Some("o")));
        assert!(is_checked(Some("v")));
        assert!(is_checked(Some("Check")));
    }

    #[test]
    fn test_empty_and_missing() {
        assert!(!is_checked(None));
        assert!(!is_checked(Some("")));
        assert!(!is_checked(Some("   \t")));
    }

    #[test]
    fn test_unrelated_values() {
        assert!(!is_checked(Some("X")));
        assert!(!is_checked(Some("-")));
        assert!(!is_checked(Some("해당없음")));
    }

    #[test]
    fn test_incidental_substring_is_accepted() {
        // 자유 텍스트 속 마커도 대상으로 본다
        assert!(is_checked(Some("TMS 교체 시 VPN 확인")));
        assert!(is_checked(Some("비대상")));
    }
}
