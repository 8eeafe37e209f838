use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tms_survey_common::ExportLayout;

#[derive(Parser)]
#[command(name = "tms-survey")]
#[command(about = "TMS 개선내역별 통합조사표 생성 도구", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 상세 로그 (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// 로그 형식 (text/json)
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 원본 파일 탐색 결과 표시
    Files {
        /// 가이드북·조사표 폴더
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// 개선내역 검색
    Search {
        /// 검색어 (개선내역 부분 일치)
        #[arg(required = true)]
        keyword: String,

        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// JSON 출력
        #[arg(long)]
        json: bool,
    },

    /// 적용 시험과 조사표 시트 확인
    Inspect {
        #[arg(required = true)]
        keyword: String,

        /// 검색 결과 중 번호 (1부터)
        #[arg(short, long)]
        index: Option<usize>,

        #[arg(short, long)]
        dir: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// 통합조사표 xlsx 생성
    Export {
        #[arg(required = true)]
        keyword: String,

        #[arg(short, long)]
        index: Option<usize>,

        /// 출력 형식 (per-test/combined). 생략 시 설정값
        #[arg(short, long)]
        layout: Option<ExportLayout>,

        /// 요약 시트 추가
        #[arg(long)]
        summary: bool,

        /// 출력 파일/디렉터리
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// 엑셀 파일 미리보기 (전체 항목 수와 앞부분 행)
    Preview {
        /// 엑셀 파일
        #[arg(required = true)]
        file: PathBuf,

        /// 시트 이름 (생략 시 첫 시트)
        #[arg(short, long)]
        sheet: Option<String>,

        /// 표시할 행 수
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,
    },

    /// 설정 표시/편집
    Config {
        /// 원본 폴더 설정
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 설정 표시
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}. Use text or json", s)),
        }
    }
}
