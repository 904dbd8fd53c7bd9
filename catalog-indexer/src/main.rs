use std::fs;
use std::path::{Path, PathBuf};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info, warn, LevelFilter};

use catalog_common::compression::write_snapshot;
use catalog_filter::engine::resource_ids;
use catalog_filter::loader::{load_catalog_report, try_load_catalog, DEFAULT_SOURCE};
use catalog_filter::LoadReport;

/// 快照文件名
const SNAPSHOT_FILE: &str = "catalog.bin";
/// JSON 输出文件名
const JSON_FILE: &str = "filters.json";

/// 命令行配置
struct IndexerConfig {
    source: PathBuf,
    output: PathBuf,
    json: bool,
    strict: bool,
    verbose: bool,
}

impl IndexerConfig {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            source: matches
                .get_one::<String>("source")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE)),
            output: matches
                .get_one::<String>("output")
                .map(PathBuf::from)
                .unwrap_or_default(),
            json: matches.get_flag("json"),
            strict: matches.get_flag("strict"),
            verbose: matches.get_flag("verbose"),
        }
    }
}

fn command() -> Command {
    Command::new("资源目录快照生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Edu Modes")
        .about("读取资源表格，生成页面使用的目录快照")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE_CSV")
            .help("资源表格路径")
            .default_value(DEFAULT_SOURCE))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("快照输出目录路径")
            .required(true))
        .arg(Arg::new("json")
            .short('j')
            .long("json")
            .help("同时输出 JSON 格式的目录")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("strict")
            .long("strict")
            .help("数据源不可用时报错，而不是输出空目录")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
}

fn main() {
    let config = IndexerConfig::from_matches(&command().get_matches());

    let default_level = if config.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    info!("开始生成目录快照...");
    info!("数据源: {}", config.source.display());
    info!("输出目录: {}", config.output.display());

    match generate_snapshot(&config) {
        Ok(()) => info!("目录快照生成成功！"),
        Err(e) => {
            error!("目录快照生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

// 生成快照的主函数
fn generate_snapshot(config: &IndexerConfig) -> Result<(), String> {
    let start_time = std::time::Instant::now();

    if !config.output.exists() {
        fs::create_dir_all(&config.output)
            .map_err(|e| format!("无法创建输出目录 '{}': {}", config.output.display(), e))?;
    }

    let report = if config.strict {
        try_load_catalog(&config.source).map_err(|e| e.to_string())?
    } else {
        load_catalog_report(&config.source)
    };

    if report.data.resources.is_empty() {
        warn!("目录为空，页面将显示“没有找到资源”");
    }
    if report.skipped > 0 {
        warn!("共跳过 {} 行无效数据", report.skipped);
    }

    write_outputs(&report, &config.output, config.json)?;

    info!("快照生成完成！耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    Ok(())
}

// 写入快照以及可选的 JSON
fn write_outputs(report: &LoadReport, output_dir: &Path, json: bool) -> Result<(), String> {
    let snapshot = report.snapshot(env!("CARGO_PKG_VERSION"));

    let snapshot_path = output_dir.join(SNAPSHOT_FILE);
    let size = write_snapshot(&snapshot_path, &snapshot)
        .map_err(|e| format!("无法写入快照文件 {}: {}", snapshot_path.display(), e))?;
    info!("快照已写入: {}，大小: {} 字节，创建时间: {}",
          snapshot_path.display(), size, snapshot.metadata.created_at.to_rfc3339());

    if json {
        let json_path = output_dir.join(JSON_FILE);
        let mut value = serde_json::to_value(&snapshot.data)
            .map_err(|e| format!("序列化 JSON 失败: {}", e))?;
        // 详情页静态路径
        value["ids"] = serde_json::json!(resource_ids(&snapshot.data.resources));
        let body = serde_json::to_string_pretty(&value)
            .map_err(|e| format!("序列化 JSON 失败: {}", e))?;
        fs::write(&json_path, body)
            .map_err(|e| format!("无法写入 JSON 文件 {}: {}", json_path.display(), e))?;
        info!("JSON 已写入: {}", json_path.display());
    }

    Ok(())
}
