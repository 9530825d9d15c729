pub mod error_logging;
pub mod filesystem;
pub mod logging;

pub use error_logging::{ErrorLogger, ErrorType};
pub use filesystem::{DirListing, FileEntry, FileSystem, FolderEntry, LocalFileSystem};
pub use logging::{Logger, LoggerTrait};
