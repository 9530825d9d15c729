//! 测试用的内存文件系统与事件记录器

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::PurgeError;
use super::observer::PurgeObserver;
use crate::infrastructure::filesystem::{DirListing, FileEntry, FileSystem, FolderEntry};

#[derive(Default)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, (u64, DateTime<Utc>)>>,
    dirs: BTreeSet<PathBuf>,
    denied: BTreeSet<PathBuf>,
    locked: BTreeSet<PathBuf>,
    /// 相对路径的基准目录
    cwd: PathBuf,
    listings: Cell<usize>,
}

impl MemoryFileSystem {
    pub fn new(root: &str) -> Self {
        let mut fs = Self::default();
        fs.dirs.insert(PathBuf::from(root));
        fs.cwd = PathBuf::from(root);
        fs
    }

    /// 已执行的目录列举次数
    pub fn listings(&self) -> usize {
        self.listings.get()
    }

    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        let path = PathBuf::from(path);
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
        self
    }

    pub fn add_file(&mut self, path: &str, size: u64, modified: DateTime<Utc>) -> &mut Self {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.add_dir(&parent.to_string_lossy());
        }
        self.files.borrow_mut().insert(path, (size, modified));
        self
    }

    /// 列出该目录时返回拒绝访问
    pub fn deny(&mut self, path: &str) -> &mut Self {
        self.denied.insert(PathBuf::from(path));
        self
    }

    /// 删除该文件时返回拒绝访问
    pub fn lock(&mut self, path: &str) -> &mut Self {
        self.locked.insert(PathBuf::from(path));
        self
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.borrow().contains_key(Path::new(path))
    }

    fn check_listable(&self, dir: &Path) -> Result<(), PurgeError> {
        if self.denied.contains(dir) {
            return Err(PurgeError::AccessDenied {
                path: dir.to_path_buf(),
            });
        }
        if !self.dirs.contains(dir) {
            return Err(PurgeError::NotFound {
                path: dir.to_path_buf(),
            });
        }
        Ok(())
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let mut resolved = self.cwd.clone();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        resolved
    }
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl FileSystem for MemoryFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        self.dirs.contains(&self.absolute(path))
    }

    fn resolve_dir(&self, path: &Path) -> Result<PathBuf, PurgeError> {
        let resolved = self.absolute(path);
        if self.dirs.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(PurgeError::NotFound {
                path: path.to_path_buf(),
            })
        }
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<FileEntry>, PurgeError> {
        self.check_listable(dir)?;
        Ok(self
            .files
            .borrow()
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, (size, modified))| FileEntry {
                path: path.clone(),
                name: name_of(path),
                size: *size,
                modified: *modified,
            })
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<FolderEntry>, PurgeError> {
        self.check_listable(dir)?;
        Ok(self
            .dirs
            .iter()
            .filter(|path| path.parent() == Some(dir))
            .map(|path| FolderEntry {
                path: path.clone(),
                name: name_of(path),
            })
            .collect())
    }

    fn list_dir(&self, dir: &Path) -> Result<DirListing, PurgeError> {
        self.listings.set(self.listings.get() + 1);
        Ok(DirListing {
            files: self.list_files(dir)?,
            dirs: self.list_dirs(dir)?,
        })
    }

    fn remove_file(&self, path: &Path) -> Result<(), PurgeError> {
        if self.locked.contains(path) {
            return Err(PurgeError::AccessDenied {
                path: path.to_path_buf(),
            });
        }
        match self.files.borrow_mut().remove(path) {
            Some(_) => Ok(()),
            None => Err(PurgeError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// 记录收到的事件
#[derive(Default)]
pub struct RecordingObserver {
    pub entered: RefCell<Vec<PathBuf>>,
    pub skipped: RefCell<Vec<(PathBuf, bool)>>,
    pub deleted: RefCell<Vec<PathBuf>>,
    pub failed: RefCell<Vec<PathBuf>>,
}

impl PurgeObserver for RecordingObserver {
    fn entering_directory(&self, dir: &Path) {
        self.entered.borrow_mut().push(dir.to_path_buf());
    }

    fn branch_skipped(&self, dir: &Path, error: &PurgeError) {
        self.skipped
            .borrow_mut()
            .push((dir.to_path_buf(), error.is_access_denied()));
    }

    fn file_deleted(&self, path: &Path) {
        self.deleted.borrow_mut().push(path.to_path_buf());
    }

    fn delete_failed(&self, path: &Path, _error: &PurgeError) {
        self.failed.borrow_mut().push(path.to_path_buf());
    }
}
