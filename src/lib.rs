//! HBnB console: a line-oriented shell over a small set of typed records,
//! persisted to a single JSON file between sessions.

pub mod config;
pub mod console;
pub mod models;
pub mod storage;
