// Bayun ORM Core

pub mod catalog;
pub mod common;
pub mod db;
pub mod driver;
pub mod query;
pub mod valuer;

// Re-export key items for convenient access
pub use catalog::{Entity, Model, ModelOpt, Registry};
pub use common::{DataValue, OrmError, OrmResult};
pub use db::{Db, DbConfig};
pub use driver::{Connection, Rows};
pub use query::{col, not, Deleter, Dialect, Executor, Querier, QueryBuilder, Selector};
pub use valuer::ScanStrategy;
