use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::domain::deletion::DeletionReport;
use crate::domain::file_walker::MatchSet;

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 输出匹配的文件列表，匹配数达到 `max_listed` 时不逐个列出
pub fn print_matches<W: Write>(
    out: &mut W,
    matches: &MatchSet,
    max_listed: usize,
    show_sizes: bool,
) -> Result<()> {
    if matches.len() < max_listed {
        for file in &matches.files {
            if show_sizes {
                writeln!(out, "{} ({})", file.path.display(), format_size(file.size, BINARY))?;
            } else {
                writeln!(out, "{}", file.path.display())?;
            }
        }
    }

    if show_sizes {
        writeln!(
            out,
            "找到 {} 个文件 ({})...",
            matches.len(),
            format_size(matches.total_bytes(), BINARY)
        )?;
    } else {
        writeln!(out, "找到 {} 个文件...", matches.len())?;
    }

    Ok(())
}

/// 输出删除结果
pub fn print_deletion_report<W: Write>(out: &mut W, report: &DeletionReport) -> Result<()> {
    for outcome in &report.outcomes {
        let name = outcome
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.path.display().to_string());
        match &outcome.result {
            Ok(()) => writeln!(out, "已删除 {}", name)?,
            Err(err) => writeln!(out, "{} 删除失败: {}", name, err)?,
        }
    }

    writeln!(
        out,
        "已删除 {} 个文件，失败 {} 个",
        report.deleted_count(),
        report.failed_count()
    )?;
    Ok(())
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub scanned_dirs: u64,
    pub matched_files: u64,
    pub total_bytes: u64,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            scanned_dirs: 0,
            matched_files: 0,
            total_bytes: 0,
        }
    }

    pub fn record(&mut self, matches: &MatchSet) {
        self.scanned_dirs = matches.scanned_dirs;
        self.matched_files = matches.len() as u64;
        self.total_bytes = matches.total_bytes();
    }

    pub fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        let duration = self.start_time.elapsed();

        writeln!(out, "\n搜索摘要:")?;
        writeln!(out, "----------------------------")?;
        writeln!(out, "总用时: {}", format_duration(duration))?;
        writeln!(out, "扫描目录: {}", self.scanned_dirs)?;
        writeln!(out, "匹配文件: {}", self.matched_files)?;
        writeln!(out, "文件总大小: {}", format_size(self.total_bytes, BINARY))?;

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}
