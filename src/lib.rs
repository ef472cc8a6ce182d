//! Natural-language analytics over a fixed `videos` / `video_snapshots`
//! schema: questions go to a language model, and only SQL that parses as a
//! single read-only query comes back out.

pub mod config;
pub mod db;
pub mod llm;
pub mod schema;
pub mod sql;
pub mod translator;
pub mod util;
pub mod web;

pub use sql::ValidatedSql;
pub use translator::{FailureKind, GenerationError, Translator};
