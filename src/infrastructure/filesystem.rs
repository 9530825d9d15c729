use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::error::PurgeError;

/// 目录中的文件条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// 目录中的子目录条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub path: PathBuf,
    pub name: String,
}

/// 一个目录的直接子项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub files: Vec<FileEntry>,
    pub dirs: Vec<FolderEntry>,
}

/// 文件系统访问trait
///
/// 每个操作都必须将"拒绝访问"与其他 I/O 错误区分开报告。
pub trait FileSystem {
    fn dir_exists(&self, path: &Path) -> bool;
    /// 将已存在的目录解析为绝对路径
    fn resolve_dir(&self, path: &Path) -> Result<PathBuf, PurgeError>;
    fn list_files(&self, dir: &Path) -> Result<Vec<FileEntry>, PurgeError>;
    fn list_dirs(&self, dir: &Path) -> Result<Vec<FolderEntry>, PurgeError>;
    fn remove_file(&self, path: &Path) -> Result<(), PurgeError>;

    /// 一次列出文件和子目录
    fn list_dir(&self, dir: &Path) -> Result<DirListing, PurgeError> {
        Ok(DirListing {
            files: self.list_files(dir)?,
            dirs: self.list_dirs(dir)?,
        })
    }
}

/// 基于 `std::fs` 的本地文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// 读取目录的直接子项，调用结束时释放目录句柄
    fn read_entries(&self, dir: &Path) -> Result<Vec<(PathBuf, String, fs::Metadata)>, PurgeError> {
        let read_dir = fs::read_dir(dir).map_err(|e| PurgeError::from_io(dir, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| PurgeError::from_io(dir, e))?;
            let path = entry.path();
            // 跟随符号链接；无法读取元数据的条目（如悬空链接）既不是文件也不是目录
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push((path, name, metadata));
        }

        Ok(entries)
    }

    fn file_entry(path: PathBuf, name: String, metadata: &fs::Metadata) -> Result<FileEntry, PurgeError> {
        let modified = metadata
            .modified()
            .map_err(|e| PurgeError::from_io(&path, e))?;
        Ok(FileEntry {
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
            path,
            name,
        })
    }
}

impl FileSystem for LocalFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn resolve_dir(&self, path: &Path) -> Result<PathBuf, PurgeError> {
        fs::canonicalize(path).map_err(|e| PurgeError::from_io(path, e))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<FileEntry>, PurgeError> {
        Ok(self.list_dir(dir)?.files)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<FolderEntry>, PurgeError> {
        Ok(self
            .read_entries(dir)?
            .into_iter()
            .filter(|(_, _, metadata)| metadata.is_dir())
            .map(|(path, name, _)| FolderEntry { path, name })
            .collect())
    }

    /// 每个目录只读取一次，元数据同时用于区分文件和子目录
    fn list_dir(&self, dir: &Path) -> Result<DirListing, PurgeError> {
        let mut listing = DirListing::default();
        for (path, name, metadata) in self.read_entries(dir)? {
            if metadata.is_file() {
                listing.files.push(Self::file_entry(path, name, &metadata)?);
            } else if metadata.is_dir() {
                listing.dirs.push(FolderEntry { path, name });
            }
        }
        Ok(listing)
    }

    fn remove_file(&self, path: &Path) -> Result<(), PurgeError> {
        fs::remove_file(path).map_err(|e| PurgeError::from_io(path, e))
    }
}
