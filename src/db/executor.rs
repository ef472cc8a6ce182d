use crate::db::db_pool::DuckDBConnectionManager;
use crate::sql::ValidatedSql;
use duckdb::types::Value;
use r2d2::{ManageConnection, Pool};
use thiserror::Error;
use tracing::debug;

pub type DbPool = Pool<DuckDBConnectionManager>;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Database connection error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),
    #[error("Query returned a non-numeric value: {0}")]
    NotNumeric(String),
    #[error("Query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub fn build_pool(connection_string: &str, pool_size: usize) -> Result<DbPool, ExecutionError> {
    let manager = DuckDBConnectionManager::new(connection_string.to_string());
    // Fail fast on a missing or unreadable file instead of waiting out the pool timeout
    drop(manager.connect()?);
    Ok(Pool::builder().max_size(pool_size.max(1) as u32).build(manager)?)
}

/// Runs validated SQL and returns the first column of the first row.
///
/// No row and NULL both read as 0.
pub fn execute_scalar(pool: &DbPool, sql: &ValidatedSql) -> Result<i64, ExecutionError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(sql.as_str())?;
    let mut rows = stmt.query([])?;

    let value = match rows.next()? {
        Some(row) => row.get::<_, Value>(0)?,
        None => Value::Null,
    };
    debug!("Scalar result: {:?}", value);

    to_number(value)
}

/// [`execute_scalar`] on the blocking thread pool.
pub async fn execute_scalar_async(pool: DbPool, sql: ValidatedSql) -> Result<i64, ExecutionError> {
    tokio::task::spawn_blocking(move || execute_scalar(&pool, &sql)).await?
}

fn to_number(value: Value) -> Result<i64, ExecutionError> {
    let overflow = |v: &dyn std::fmt::Debug| ExecutionError::NotNumeric(format!("{:?} does not fit in i64", v));

    Ok(match value {
        Value::Null => 0,
        Value::Boolean(b) => b as i64,
        Value::TinyInt(n) => n.into(),
        Value::SmallInt(n) => n.into(),
        Value::Int(n) => n.into(),
        Value::BigInt(n) => n,
        Value::HugeInt(n) => i64::try_from(n).map_err(|_| overflow(&n))?,
        Value::UTinyInt(n) => n.into(),
        Value::USmallInt(n) => n.into(),
        Value::UInt(n) => n.into(),
        Value::UBigInt(n) => i64::try_from(n).map_err(|_| overflow(&n))?,
        Value::Float(n) => n.trunc() as i64,
        Value::Double(n) => n.trunc() as i64,
        Value::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(|n| n.trunc() as i64)
            .map_err(|_| ExecutionError::NotNumeric(d.to_string()))?,
        other => return Err(ExecutionError::NotNumeric(format!("{:?}", other))),
    })
}
