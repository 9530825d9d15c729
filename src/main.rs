use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use file_purge::{
    Config, ConsoleObserver, ErrorLogger, LocalFileSystem, Logger, LoggerTrait, Shell,
    SearchSummary, ShellOptions, ShellOutcome,
};

/// 按通配符、目录名和修改时间查找并删除文件
///
/// 不带参数时进入交互模式；给出根目录和搜索条件时执行一次并自动确认删除。
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 搜索根目录
    root: Option<PathBuf>,

    /// 搜索条件: filematch [foldermatch] [ignorematch] [olderThan] [newerThan]
    criteria: Vec<String>,

    /// 只列出将被删除的文件，不执行删除
    #[clap(long)]
    dry_run: bool,

    /// 启用日志记录，日志文件写入配置的日志目录
    #[clap(long)]
    log: bool,

    /// 配置文件路径（默认为程序所在目录下的 config.toml）
    #[clap(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let path = match path {
        Some(path) => path.clone(),
        None => match Config::default_config_path() {
            Ok(path) => path,
            Err(err) => {
                eprintln!("警告: {:#}，使用默认配置", err);
                return Config::default();
            }
        },
    };

    Config::load_or_create(&path).unwrap_or_else(|err| {
        eprintln!("警告: {:#}，使用默认配置", err);
        Config::default()
    })
}

/// 写入日志结尾和错误摘要；日志写入失败只打印警告，不覆盖运行结果
fn finish_run<W: Write>(
    result: Result<ShellOutcome>,
    logger: &dyn LoggerTrait,
    error_logger: &ErrorLogger,
    summary: &SearchSummary,
    out: &mut W,
) -> Result<ShellOutcome> {
    let deleted = match &result {
        Ok(ShellOutcome::Purged { deleted, .. }) => *deleted as u64,
        _ => 0,
    };

    if let Err(err) = logger.finalize(
        summary.scanned_dirs,
        summary.matched_files,
        deleted,
        summary.start_time.elapsed(),
    ) {
        eprintln!("警告: 无法写入日志: {:#}", err);
    }
    if let Err(err) = error_logger.finalize() {
        eprintln!("警告: 无法写入错误日志: {:#}", err);
    }
    if let Err(err) = error_logger.print_error_summary(out) {
        eprintln!("警告: 无法输出错误摘要: {:#}", err);
    }

    result
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref());

    let log_enabled = args.log || config.logging.enabled;
    let logger = Logger::new(log_enabled, &config.log_dir())?;
    let error_logger = ErrorLogger::new(log_enabled, &config.log_dir())?;

    let fs = LocalFileSystem::new();
    let observer = ConsoleObserver::new(io::stderr().is_terminal(), &logger, &error_logger);
    let mut options = ShellOptions::from_config(&config, args.dry_run);
    if let Some(root) = &args.root {
        options.default_root = Some(root.clone());
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(&fs, &observer, &logger, stdin.lock(), io::stdout(), options);

    let result = match (&args.root, args.criteria.is_empty()) {
        (Some(root), false) => shell.run_once(root, &args.criteria.join(" ")),
        _ => shell.run_interactive(),
    };

    let summary = shell.summary();
    finish_run(result, &logger, &error_logger, summary, &mut io::stdout()).map(|_| ())
}
