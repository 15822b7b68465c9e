use crate::error::Error;

pub mod error;
pub mod skipset;

pub use skipset::config::SkipSetConfig;
pub use skipset::cursor::Cursor;
pub use skipset::ordered_skipset::{IntoIter, Iter, OrderedSkipSet, DEFAULT_MAX_LEVEL};
pub use skipset::skiplist::{SkipList, SkipListCursor};

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! ensure {
    ($cond:expr,$err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}
