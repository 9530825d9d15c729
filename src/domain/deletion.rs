use std::path::{Path, PathBuf};

use super::error::PurgeError;
use super::observer::PurgeObserver;
use crate::infrastructure::filesystem::FileSystem;

/// 单个文件的删除结果
#[derive(Debug)]
pub struct DeleteOutcome {
    pub path: PathBuf,
    pub result: Result<(), PurgeError>,
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 批量删除报告，按请求顺序保存每个文件的结果
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<DeleteOutcome>,
}

impl DeletionReport {
    pub fn deleted(&self) -> impl Iterator<Item = &DeleteOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeleteOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }
}

/// 尽力而为的批量删除
///
/// 调用前由外部完成确认；这里不再询问。单个文件失败不会中断批处理，也不会回滚已删除的文件。
pub struct DeletionExecutor<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    observer: &'a dyn PurgeObserver,
}

impl<'a, F: FileSystem + ?Sized> DeletionExecutor<'a, F> {
    pub fn new(fs: &'a F, observer: &'a dyn PurgeObserver) -> Self {
        Self { fs, observer }
    }

    pub fn delete_all<P: AsRef<Path>>(&self, paths: &[P]) -> DeletionReport {
        let outcomes = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let result = self.fs.remove_file(path);
                match &result {
                    Ok(()) => self.observer.file_deleted(path),
                    Err(err) => self.observer.delete_failed(path, err),
                }
                DeleteOutcome {
                    path: path.to_path_buf(),
                    result,
                }
            })
            .collect();

        DeletionReport { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observer::NullObserver;
    use crate::domain::testing::{MemoryFileSystem, RecordingObserver};
    use crate::infrastructure::filesystem::LocalFileSystem;
    use chrono::Utc;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_does_not_stop_batch() {
        let mut memfs = MemoryFileSystem::new("/r");
        memfs
            .add_file("/r/f1", 1, Utc::now())
            .add_file("/r/f3", 1, Utc::now());

        let observer = RecordingObserver::default();
        let report = DeletionExecutor::new(&memfs, &observer).delete_all(&["/r/f1", "/r/f2", "/r/f3"]);

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].is_success());
        assert!(matches!(
            report.outcomes[1].result,
            Err(PurgeError::NotFound { .. })
        ));
        assert!(report.outcomes[2].is_success());
        assert_eq!(report.deleted_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!memfs.contains_file("/r/f1"));
        assert!(!memfs.contains_file("/r/f3"));
        assert_eq!(*observer.failed.borrow(), vec![PathBuf::from("/r/f2")]);
        assert_eq!(observer.deleted.borrow().len(), 2);
    }

    #[test]
    fn test_locked_file_reports_access_denied() {
        let mut memfs = MemoryFileSystem::new("/r");
        memfs
            .add_file("/r/a", 1, Utc::now())
            .add_file("/r/b", 1, Utc::now())
            .lock("/r/a");

        let report = DeletionExecutor::new(&memfs, &NullObserver).delete_all(&["/r/a", "/r/b"]);

        assert!(report.outcomes[0]
            .result
            .as_ref()
            .is_err_and(|e| e.is_access_denied()));
        assert!(memfs.contains_file("/r/a"));
        assert!(!memfs.contains_file("/r/b"));
    }

    #[test]
    fn test_empty_batch() {
        let memfs = MemoryFileSystem::new("/r");
        let empty: [&str; 0] = [];
        let report = DeletionExecutor::new(&memfs, &NullObserver).delete_all(&empty);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_deletes_real_files() {
        let temp_dir = tempdir().unwrap();
        let f1 = temp_dir.path().join("f1.log");
        let f2 = temp_dir.path().join("f2.log");
        let f3 = temp_dir.path().join("f3.log");
        fs::write(&f1, "1").unwrap();
        fs::write(&f3, "3").unwrap();

        let report = DeletionExecutor::new(&LocalFileSystem::new(), &NullObserver)
            .delete_all(&[f1.clone(), f2.clone(), f3.clone()]);

        assert_eq!(report.deleted_count(), 2);
        assert_eq!(report.failed().next().map(|o| o.path.clone()), Some(f2));
        assert!(!f1.exists());
        assert!(!f3.exists());
    }
}
