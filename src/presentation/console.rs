use std::cell::RefCell;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::error::PurgeError;
use crate::domain::observer::PurgeObserver;
use crate::infrastructure::{ErrorLogger, ErrorType, LoggerTrait};

/// 控制台事件接收者: 搜索期间显示旋转指示器，并把事件写入日志
pub struct ConsoleObserver<'a> {
    show_spinner: bool,
    spinner: RefCell<Option<ProgressBar>>,
    logger: &'a dyn LoggerTrait,
    errors: &'a ErrorLogger,
}

impl<'a> ConsoleObserver<'a> {
    pub fn new(show_spinner: bool, logger: &'a dyn LoggerTrait, errors: &'a ErrorLogger) -> Self {
        Self {
            show_spinner,
            spinner: RefCell::new(None),
            logger,
            errors,
        }
    }

    fn create_spinner(&self) -> ProgressBar {
        if !self.show_spinner {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            progress.set_style(style);
        }
        progress
    }

    /// 暂停指示器后执行输出，避免与指示器的绘制互相覆盖
    fn spinner_suspended<F: FnOnce()>(&self, f: F) {
        match self.spinner.borrow().as_ref() {
            Some(progress) => progress.suspend(f),
            None => f(),
        }
    }
}

impl PurgeObserver for ConsoleObserver<'_> {
    fn entering_directory(&self, dir: &Path) {
        let mut spinner = self.spinner.borrow_mut();
        let progress = spinner.get_or_insert_with(|| self.create_spinner());
        progress.set_message(format!("正在搜索 {}", dir.display()));
        progress.tick();

        if self.logger.is_enabled() {
            let _ = self.logger.log_message(&format!("进入目录: {}", dir.display()));
        }
    }

    fn file_matched(&self, path: &Path, size: u64) {
        if self.logger.is_enabled() {
            let _ = self.logger.log_file(path, size, "匹配");
        }
    }

    fn branch_skipped(&self, dir: &Path, error: &PurgeError) {
        self.spinner_suspended(|| eprintln!("已跳过 {}: {}", dir.display(), error));
        let _ = self
            .errors
            .log_error(ErrorType::for_traversal(error), dir, error);
        if self.logger.is_enabled() {
            let _ = self
                .logger
                .log_message(&format!("跳过分支 {}: {}", dir.display(), error));
        }
    }

    fn search_finished(&self) {
        if let Some(progress) = self.spinner.borrow_mut().take() {
            progress.finish_and_clear();
        }
    }

    fn file_deleted(&self, path: &Path) {
        if self.logger.is_enabled() {
            let _ = self.logger.log_file(path, 0, "已删除");
        }
    }

    fn delete_failed(&self, path: &Path, error: &PurgeError) {
        let _ = self.errors.log_error(ErrorType::Delete, path, error);
        if self.logger.is_enabled() {
            let _ = self.logger.log_file(path, 0, &format!("删除失败: {}", error));
        }
    }
}
