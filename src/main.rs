use clap::Parser;
use cli::{Cli, Commands, LogFormat};
use config::Config;
use error::Result;
use std::path::Path;
use tms_survey::{cli, config, error, export, scanner, selector, workbook};
use tms_survey::{Inspection, LoadOptions, Session, SourceRepository};
use tms_survey_common::report::SHEET_NOT_FOUND;
use tms_survey_common::{ExportOptions, GuideRow, Section};

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "tms_survey=warn,tms_survey_common=warn",
        1 => "tms_survey=debug,tms_survey_common=debug",
        _ => "tms_survey=trace,tms_survey_common=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn open_session(config: &Config, dir: Option<&Path>) -> Result<Session> {
    let data_dir = config.resolve_data_dir(dir);
    let files = scanner::discover_sources(&data_dir, &config.file_keywords)?;
    let options = LoadOptions {
        guide_sheet: config.guide_sheet.clone(),
        header_row: config.header_row,
    };
    let repository = SourceRepository::open(files, options)?;
    Ok(Session::new(repository, config.matching.clone()))
}

fn find_row(session: &Session, keyword: &str, index: Option<usize>) -> Result<GuideRow> {
    let rows = session.search(keyword);
    selector::select_row(&rows, index, keyword).cloned()
}

fn print_file(label: &str, path: Option<&Path>) {
    match path {
        Some(p) => println!("  {}: {}", label, p.display()),
        None => println!("  {}: (없음)", label),
    }
}

fn print_inspection(inspection: &Inspection) {
    let row = &inspection.row;
    println!("[{}] {}", row.category, row.description);
    if let Some(remarks) = &row.remarks {
        println!("  참고: {}", remarks);
    }

    for section in Section::ALL {
        let matches = inspection.matches.section(section);
        if matches.is_empty() {
            continue;
        }
        println!("\n{}", section);
        for m in matches {
            if m.is_found() {
                let names: Vec<&str> = m.sheets.iter().map(|s| s.name.as_str()).collect();
                println!("  ✔ {} → {}", m.column.name, names.join(", "));
            } else {
                println!("  ✘ {} → {}", m.column.name, SHEET_NOT_FOUND);
            }
        }
    }

    if inspection.matches.matches.is_empty() {
        println!("\n해당 시험 없음");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    let config = Config::load()?;

    match cli.command {
        Commands::Files { dir } => {
            let data_dir = config.resolve_data_dir(dir.as_deref());
            let files = scanner::discover_sources(&data_dir, &config.file_keywords)?;
            println!("원본 파일 ({}):", data_dir.display());
            print_file("가이드북", Some(&files.guide));
            for section in Section::ALL {
                print_file(section.label(), files.get(section));
            }
        }

        Commands::Search { keyword, dir, json } => {
            let session = open_session(&config, dir.as_deref())?;
            let rows = session.search(&keyword);

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("'{}'에 해당하는 개선내역이 없습니다", keyword);
            } else {
                println!("'{}' 검색 결과 {}건\n", keyword, rows.len());
                for (i, row) in rows.iter().enumerate() {
                    println!("  {}) {}", i + 1, selector::row_label(row));
                }
            }
        }

        Commands::Inspect { keyword, index, dir, json } => {
            let session = open_session(&config, dir.as_deref())?;
            let row = find_row(&session, &keyword, index)?;
            let inspection = session.inspect(row.source_row)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&inspection.matches)?);
            } else {
                print_inspection(&inspection);
            }
        }

        Commands::Export { keyword, index, layout, summary, output, dir } => {
            println!("📄 tms-survey - 통합조사표 생성\n");

            println!("[1/3] 원본 파일 읽는 중...");
            let session = open_session(&config, dir.as_deref())?;
            println!("✔ 가이드북 {}행\n", session.repository().snapshot().guide.rows().len());

            println!("[2/3] 시트 매칭 중...");
            let row = find_row(&session, &keyword, index)?;
            let inspection = session.inspect(row.source_row)?;
            print_inspection(&inspection);
            println!();

            println!("[3/3] 엑셀 생성 중...");
            let options = ExportOptions {
                layout: layout.unwrap_or(config.export_layout),
                include_summary: summary,
            };
            match session.export(&inspection, &options)? {
                Some(buffer) => {
                    let output = output.unwrap_or_else(|| std::path::PathBuf::from("."));
                    let title = export::export_title(&inspection.row.description);
                    let path = export::write_workbook(&buffer, &output, &title)?;
                    println!("✔ 저장: {} ({}, 시트 {}장)", path.display(), options.layout, inspection.bundle.entries.len());
                    println!("\n✅ 완료");
                }
                None => {
                    println!("⚠ 매칭된 시트가 없어 파일을 만들지 않았습니다");
                }
            }
        }

        Commands::Preview { file, sheet, rows } => {
            let table = workbook::preview_sheet(&file, sheet.as_deref())?;
            println!("📋 {} ({})", file.display(), table.name);
            println!("전체 항목 수: {}개\n", table.row_count());

            println!("  {}", table.headers.join(" | "));
            for row in table.rows.iter().take(rows) {
                println!("  {}", row.join(" | "));
            }
            if table.row_count() > rows {
                println!("  ... 외 {}행", table.row_count() - rows);
            }
        }

        Commands::Config { set_data_dir, show } => {
            let mut config = config;

            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir)?;
                println!("✔ 원본 폴더를 설정했습니다");
            }

            if show {
                println!("설정 ({}):", Config::config_path()?.display());
                println!(
                    "  원본 폴더: {}",
                    config
                        .data_dir
                        .as_ref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "(현재 폴더)".into())
                );
                println!("  가이드북 시트: {}", config.guide_sheet.as_deref().unwrap_or("(자동)"));
                println!(
                    "  헤더 행: {}",
                    config.header_row.map(|r| r.to_string()).unwrap_or_else(|| "(자동)".into())
                );
                println!("  출력 형식: {}", config.export_layout);
                println!("  상대정확도 매칭: {:?}", config.matching.relative_accuracy);
            }
        }
    }

    Ok(())
}
