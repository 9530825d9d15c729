use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_file(&self, path: &Path, size: u64, status: &str) -> Result<()>;
    fn finalize(&self, scanned_dirs: u64, matched_files: u64, deleted_files: u64, duration: std::time::Duration) -> Result<()>;
}

/// 运行日志记录器（搜索参数、匹配与删除记录）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，日志文件写入 `log_dir`
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        // 获取当前时间作为文件名的一部分
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("purge_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# FilePurge 运行日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
        })
    }

    pub fn disabled() -> Self {
        Self {
            log_file: Arc::new(Mutex::new(None)),
            log_path: PathBuf::new(),
            enabled: false,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_line(&self, line: &str) -> Result<()> {
        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "{}", line)?;
                file.flush()?;
            }
        }
        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(&format!("[{}] {}", timestamp, message))
    }

    fn log_file(&self, path: &Path, size: u64, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(&format!(
            "[{}] 文件: {} | 大小: {} 字节 | 状态: {}",
            timestamp,
            path.display(),
            size,
            status
        ))
    }

    fn finalize(&self, scanned_dirs: u64, matched_files: u64, deleted_files: u64, duration: std::time::Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        self.write_line("")?;
        self.write_line("# --------------------------------------------")?;
        self.write_line(&format!("# 结束时间: {}", now.format("%Y-%m-%d %H:%M:%S")))?;
        self.write_line(&format!("# 扫描目录数: {}", scanned_dirs))?;
        self.write_line(&format!("# 匹配文件数: {}", matched_files))?;
        self.write_line(&format!("# 删除文件数: {}", deleted_files))?;
        self.write_line(&format!("# 总耗时: {:?}", duration))?;

        println!("完整日志已保存到: {}", self.log_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = Logger::disabled();
        assert!(!logger.is_enabled());
        logger.log_message("ignored").unwrap();
        logger.log_file(Path::new("a.txt"), 1, "已删除").unwrap();
        assert_eq!(logger.log_path(), Path::new(""));
    }

    #[test]
    fn test_enabled_logger_writes_lines() {
        let temp_dir = tempdir().unwrap();
        let logger = Logger::new(true, temp_dir.path()).unwrap();

        logger.log_message("搜索条件: *.png").unwrap();
        logger.log_file(Path::new("/r/x.png"), 42, "匹配").unwrap();
        logger
            .finalize(3, 1, 1, std::time::Duration::from_millis(5))
            .unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.starts_with('\u{feff}'));
        assert!(content.contains("搜索条件: *.png"));
        assert!(content.contains("/r/x.png | 大小: 42 字节 | 状态: 匹配"));
        assert!(content.contains("# 删除文件数: 1"));
    }
}
