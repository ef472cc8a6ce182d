pub mod extract;
pub mod validate;

pub use extract::clean;
pub use validate::{Rejection, SqlSafetyValidator, StatementKind, ValidatedSql, validate};
