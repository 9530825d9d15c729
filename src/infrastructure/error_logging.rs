use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

use crate::domain::error::PurgeError;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 遍历时拒绝访问
    AccessDenied,
    /// 遍历时的其他错误
    Traversal,
    /// 删除失败
    Delete,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::AccessDenied => "拒绝访问",
            ErrorType::Traversal => "目录遍历",
            ErrorType::Delete => "文件删除",
        }
    }

    /// 遍历错误的分类
    pub fn for_traversal(error: &PurgeError) -> Self {
        if error.is_access_denied() {
            ErrorType::AccessDenied
        } else {
            ErrorType::Traversal
        }
    }
}

/// 错误日志记录器
///
/// 错误计数始终进行；只有启用时才写入文件。
pub struct ErrorLogger {
    error_file: Arc<Mutex<Option<File>>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorLogger {
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let error_path = log_dir.join(format!("error_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)
            .with_context(|| format!("无法创建错误日志文件: {}", error_path.display()))?;

        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM

        writeln!(file_clone, "# FilePurge 错误日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Arc::new(Mutex::new(Some(file))),
            error_path,
            enabled: true,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn disabled() -> Self {
        Self {
            error_file: Arc::new(Mutex::new(None)),
            error_path: PathBuf::new(),
            enabled: false,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 记录错误
    pub fn log_error(&self, error_type: ErrorType, path: &Path, error: &PurgeError) -> Result<()> {
        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), error)?;
                writeln!(file, "  路径: {}", path.display())?;
                writeln!(file)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        self.error_counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    pub fn get_total_errors(&self) -> usize {
        self.get_error_summary().values().sum()
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

                let summary = self.get_error_summary();
                if summary.is_empty() {
                    writeln!(file, "# 无错误记录")?;
                } else {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", self.get_total_errors())?;
                }
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要
    pub fn print_error_summary<W: Write>(&self, out: &mut W) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }

        writeln!(out, "\n⚠️  过程中发生错误:")?;
        writeln!(out, "----------------------------")?;
        for (error_type, count) in &self.get_error_summary() {
            writeln!(out, "  {}: {} 次", error_type.as_str(), count)?;
        }
        writeln!(out, "  总计: {} 个错误", self.get_total_errors())?;
        if self.enabled {
            writeln!(out, "  详细错误信息请查看: {}", self.error_path.display())?;
        }
        Ok(())
    }
}
