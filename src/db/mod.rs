pub mod db_pool;
pub mod executor;

pub use executor::{DbPool, ExecutionError, build_pool, execute_scalar, execute_scalar_async};
