pub(crate) mod arena;
pub mod config;
pub mod cursor;
pub mod ordered_skipset;
pub mod skiplist;
