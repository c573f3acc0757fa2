// ==========================================
// 营地报名管理后台 - 命令行入口
// ==========================================
// 用法:
//   camp-import import <file.csv> --registration <id> [--db <path>] [--batch-size N] [--json]
//   camp-import template [<path>]
// ==========================================

use anyhow::{anyhow, bail, Context};
use camp_participant_import::config::{ConfigManager, ImportConfigReader};
use camp_participant_import::db::{get_default_db_path, open_sqlite_connection};
use camp_participant_import::domain::ImportContext;
use camp_participant_import::importer::{write_template, ImportSession, TEMPLATE_FILE_NAME};
use camp_participant_import::logging;
use camp_participant_import::repository::ParticipantRepositoryImpl;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const USAGE: &str = "\
用法:
  camp-import import <file.csv> --registration <id> [--db <path>] [--batch-size N] [--json]
  camp-import template [<path>]";

struct ImportArgs {
    file: PathBuf,
    registration_id: String,
    db_path: Option<String>,
    batch_size: Option<usize>,
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("import") => {
            let import_args = parse_import_args(args)?;
            run_import(import_args).await
        }
        Some("template") => {
            let path = args
                .next()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME));
            write_template(&path)?;
            println!("模板已写入: {}", path.display());
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            bail!("缺少或未知的子命令");
        }
    }
}

fn parse_import_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<ImportArgs> {
    let mut file = None;
    let mut registration_id = None;
    let mut db_path = None;
    let mut batch_size = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--registration" => registration_id = args.next(),
            "--db" => db_path = args.next(),
            "--json" => json = true,
            "--batch-size" => {
                let raw = args.next().ok_or_else(|| anyhow!("--batch-size 需要参数"))?;
                batch_size = Some(
                    raw.parse::<usize>()
                        .with_context(|| format!("无效的 --batch-size: {}", raw))?,
                );
            }
            other if other.starts_with("--") => bail!("未知参数: {}\n{}", other, USAGE),
            other => file = Some(PathBuf::from(other)),
        }
    }

    Ok(ImportArgs {
        file: file.ok_or_else(|| anyhow!("缺少 CSV 文件路径\n{}", USAGE))?,
        registration_id: registration_id
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| anyhow!("缺少 --registration\n{}", USAGE))?,
        db_path,
        batch_size,
        json,
    })
}

async fn run_import(args: ImportArgs) -> anyhow::Result<()> {
    let db_path = args.db_path.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let conn = Arc::new(Mutex::new(
        open_sqlite_connection(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))?,
    ));
    let config_manager = ConfigManager::from_connection(conn.clone())?;
    let repo = ParticipantRepositoryImpl::from_connection(conn)?;

    let mut config = config_manager.load_import_config().await?;
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    let context =
        ImportContext::new(args.registration_id).with_user_id(config.default_user_id.clone());
    let mut session = ImportSession::new(context, config)?;

    session.upload_file(&args.file)?;
    let preview = session.validate()?;
    let summary = preview.summary();
    println!(
        "预览: 共 {} 行, 有效 {}, 无效 {}, 警告 {}",
        summary.total_rows, summary.valid, summary.invalid, summary.warning
    );
    for row in &preview.invalid {
        let messages: Vec<String> = row.errors.iter().map(|e| e.to_string()).collect();
        println!("  第 {} 行: {}", row.row_number, messages.join("; "));
    }
    for row in &preview.warnings {
        let messages: Vec<String> = row.warnings.iter().map(|w| w.to_string()).collect();
        println!("  第 {} 行(警告): {}", row.row_number, messages.join("; "));
    }

    let result = session
        .execute_import(&repo, |progress| {
            println!("进度: {:.0}% ({}/{})", progress.percent, progress.processed, progress.total);
        })
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("导入完成: 成功 {}, 失败 {}", result.succeeded, result.failed);
    }
    if result.failed > 0 {
        bail!("{} 条记录写入失败", result.failed);
    }
    Ok(())
}
