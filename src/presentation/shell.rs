use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::application::Config;
use crate::domain::criteria::{Criteria, COMMAND_GRAMMAR};
use crate::domain::deletion::{DeletionExecutor, DeletionReport};
use crate::domain::file_walker::{DirectoryWalker, MatchSet};
use crate::domain::observer::PurgeObserver;
use crate::infrastructure::{FileSystem, LoggerTrait};

use super::display::{print_deletion_report, print_matches, SearchSummary};

const BANNER: &str = "\nFile Purge 文件清理工具\n";

const USAGE_EXAMPLES: &str = "示例:

删除所有 png 文件
*.png

删除名称以 to_delete 结尾的目录中的所有 png 文件
*.png *to_delete

删除以 to_delete 结尾的目录中早于 2024-01-01 且晚于 2023-12-01 的 png 文件，跳过以 keep.png 结尾的文件
*.png *to_delete *keep.png 2024-01-01 2023-12-01
";

/// 交互选项
#[derive(Debug, Clone)]
pub struct ShellOptions {
    /// 无效输入的最大尝试次数
    pub max_attempts: u32,
    pub max_listed: usize,
    pub show_sizes: bool,
    /// 只列出将被删除的文件
    pub dry_run: bool,
    pub default_root: Option<PathBuf>,
}

impl ShellOptions {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            max_attempts: config.prompt.max_attempts,
            max_listed: config.search.max_listed,
            show_sizes: config.display.show_sizes,
            dry_run,
            default_root: config.search.default_root.as_ref().map(PathBuf::from),
        }
    }
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), false)
    }
}

/// 一次会话的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    /// 已执行删除
    Purged { deleted: usize, failed: usize },
    /// 没有删除任何文件（无匹配或 dry-run）
    NothingDeleted,
    /// 无效输入次数达到上限
    GaveUp,
    /// 输入流结束
    EndOfInput,
}

/// 交互式外壳
///
/// 负责提示、确认与输出；搜索和删除交给核心逻辑完成。
pub struct Shell<'a, F: FileSystem + ?Sized, R: BufRead, W: Write> {
    fs: &'a F,
    observer: &'a dyn PurgeObserver,
    logger: &'a dyn LoggerTrait,
    input: R,
    out: W,
    options: ShellOptions,
    summary: SearchSummary,
}

impl<'a, F: FileSystem + ?Sized, R: BufRead, W: Write> Shell<'a, F, R, W> {
    pub fn new(
        fs: &'a F,
        observer: &'a dyn PurgeObserver,
        logger: &'a dyn LoggerTrait,
        input: R,
        out: W,
        options: ShellOptions,
    ) -> Self {
        Self {
            fs,
            observer,
            logger,
            input,
            out,
            options,
            summary: SearchSummary::new(),
        }
    }

    /// 最近一次搜索的摘要
    pub fn summary(&self) -> &SearchSummary {
        &self.summary
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// 交互模式: 询问根目录，然后循环询问搜索条件直到完成一次删除
    pub fn run_interactive(&mut self) -> Result<ShellOutcome> {
        writeln!(self.out, "{}", BANNER)?;

        let root = match self.prompt_root()? {
            Ok(root) => root,
            Err(outcome) => return Ok(outcome),
        };
        writeln!(self.out, "根目录已设置为: {}", root.display())?;
        self.print_usage()?;

        loop {
            let criteria = match self.prompt_criteria()? {
                Ok(criteria) => criteria,
                Err(outcome) => return Ok(outcome),
            };

            let matches = match self.search(&root, &criteria) {
                Ok(matches) => matches,
                Err(err) => {
                    writeln!(self.out, "搜索失败: {:#}", err)?;
                    continue;
                }
            };
            if matches.is_empty() {
                continue;
            }

            write!(self.out, "是否删除? [y/n] ")?;
            self.out.flush()?;
            let answer = match self.read_line()? {
                Some(answer) => answer,
                None => return Ok(ShellOutcome::EndOfInput),
            };
            if !answer.trim().eq_ignore_ascii_case("y") {
                continue;
            }

            let outcome = self.purge(&matches)?;
            writeln!(self.out, "全部完成。")?;
            return Ok(outcome);
        }
    }

    /// 命令行模式: 执行一次完整流程，删除自动确认
    pub fn run_once(&mut self, root: &Path, criteria_line: &str) -> Result<ShellOutcome> {
        if !self.fs.dir_exists(root) {
            bail!("目录不存在: {}", root.display());
        }
        let root = self
            .fs
            .resolve_dir(root)
            .with_context(|| format!("无法解析根目录: {}", root.display()))?;

        let criteria = Criteria::parse_line(criteria_line)
            .validated()
            .with_context(|| format!("无法解析搜索条件: {}", criteria_line))?;

        let matches = self.search(&root, &criteria)?;
        if matches.is_empty() {
            return Ok(ShellOutcome::NothingDeleted);
        }

        writeln!(self.out, "是否删除? [y/n] y (自动确认)")?;
        self.purge(&matches)
    }

    /// 询问根目录；空输入使用默认根目录或当前目录，返回绝对路径
    fn prompt_root(&mut self) -> Result<std::result::Result<PathBuf, ShellOutcome>> {
        for _ in 0..self.options.max_attempts {
            writeln!(self.out, "请输入搜索根目录:")?;
            if let Some(default_root) = &self.options.default_root {
                writeln!(self.out, "(直接回车使用 {})", default_root.display())?;
            }
            self.out.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(Err(ShellOutcome::EndOfInput)),
            };

            let root = if line.trim().is_empty() {
                self.options
                    .default_root
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("."))
            } else {
                PathBuf::from(line.trim())
            };

            if self.fs.dir_exists(&root) {
                if let Ok(resolved) = self.fs.resolve_dir(&root) {
                    return Ok(Ok(resolved));
                }
            }
            writeln!(self.out, "目录不存在，请重试...")?;
        }

        writeln!(self.out, "尝试次数过多，已退出。")?;
        Ok(Err(ShellOutcome::GaveUp))
    }

    /// 询问搜索条件，最多允许 `max_attempts` 次无效输入
    fn prompt_criteria(&mut self) -> Result<std::result::Result<Criteria, ShellOutcome>> {
        for attempt in 1..=self.options.max_attempts {
            writeln!(self.out, "请输入清理命令:")?;
            self.out.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(Err(ShellOutcome::EndOfInput)),
            };

            let criteria = Criteria::parse_line(&line);
            if criteria.is_valid() {
                return Ok(Ok(criteria));
            }

            writeln!(
                self.out,
                "无效的命令 ({}/{})",
                attempt, self.options.max_attempts
            )?;
            if attempt < self.options.max_attempts {
                self.print_usage()?;
            }
        }

        writeln!(self.out, "尝试次数过多，已退出。")?;
        Ok(Err(ShellOutcome::GaveUp))
    }

    /// 每次搜索都从空结果集开始
    fn search(&mut self, root: &Path, criteria: &Criteria) -> Result<MatchSet> {
        if self.logger.is_enabled() {
            self.logger.log_message(&format!("根目录: {}", root.display()))?;
            self.logger.log_message(&format!(
                "搜索条件: 文件={} 目录={} 忽略={} 早于={} 晚于={}",
                criteria.file_match().as_str(),
                criteria.folder_match().as_str(),
                criteria.ignore_match().as_str(),
                criteria.older_than(),
                criteria.newer_than()
            ))?;
        }

        writeln!(self.out, "正在搜索...")?;
        self.summary = SearchSummary::new();
        let matches = DirectoryWalker::new(self.fs, self.observer)
            .search(root, criteria)
            .with_context(|| format!("无法搜索目录: {}", root.display()))?;
        self.summary.record(&matches);
        writeln!(self.out, "搜索完成。")?;

        print_matches(
            &mut self.out,
            &matches,
            self.options.max_listed,
            self.options.show_sizes,
        )?;
        Ok(matches)
    }

    fn purge(&mut self, matches: &MatchSet) -> Result<ShellOutcome> {
        if self.options.dry_run {
            for file in &matches.files {
                writeln!(self.out, "将删除: {}", file.path.display())?;
            }
            writeln!(self.out, "预演模式: 没有删除任何文件。")?;
            return Ok(ShellOutcome::NothingDeleted);
        }

        writeln!(self.out, "正在删除!")?;
        let report: DeletionReport =
            DeletionExecutor::new(self.fs, self.observer).delete_all(matches.paths().as_slice());
        print_deletion_report(&mut self.out, &report)?;

        Ok(ShellOutcome::Purged {
            deleted: report.deleted_count(),
            failed: report.failed_count(),
        })
    }

    fn print_usage(&mut self) -> Result<()> {
        writeln!(self.out, "清理命令格式:")?;
        writeln!(self.out, "{}", COMMAND_GRAMMAR)?;
        writeln!(self.out, "{}", USAGE_EXAMPLES)?;
        Ok(())
    }

    /// 读取一行并去掉行尾换行符；输入结束时返回 `None`
    ///
    /// 空格保留，它们决定参数的拆分。
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
