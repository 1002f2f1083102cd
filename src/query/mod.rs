// Query Module
//
// Predicate trees, SQL rendering and the SELECT / DELETE statement builders.

pub mod ast;
pub mod builder;
pub mod delete;
pub mod dialect;
pub mod select;
pub mod types;

pub use self::ast::{col, not, Column, Expression, Op, Predicate};
pub use self::builder::Builder;
pub use self::delete::Deleter;
pub use self::dialect::Dialect;
pub use self::select::Selector;
pub use self::types::{ExecResult, Executor, Querier, Query, QueryBuilder};
