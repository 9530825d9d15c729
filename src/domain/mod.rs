pub mod criteria;
pub mod deletion;
pub mod error;
pub mod file_walker;
pub mod observer;
pub mod pattern;

#[cfg(test)]
pub(crate) mod testing;

pub use criteria::{Criteria, Timestamp, COMMAND_GRAMMAR};
pub use deletion::{DeleteOutcome, DeletionExecutor, DeletionReport};
pub use error::PurgeError;
pub use file_walker::{search, DirectoryWalker, MatchSet};
pub use observer::{NullObserver, PurgeObserver};
pub use pattern::{matches, PatternShape, WildcardPattern};
