// Query Types
//
// The built statement and the traits implemented by the statement builders.

use crate::common::error::OrmResult;
use crate::common::types::DataValue;

/// SQL text plus its bound arguments, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    args: Vec<DataValue>,
}

impl Query {
    pub fn new(sql: String, args: Vec<DataValue>) -> Self {
        Query { sql, args }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[DataValue] {
        &self.args
    }
}

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    pub rows_affected: u64,
}

/// Anything that renders to a [`Query`]
pub trait QueryBuilder {
    fn build(&self) -> OrmResult<Query>;
}

/// Statements that read entities (SELECT)
pub trait Querier<T> {
    /// First row of the result set; `NoRows` when it is empty
    fn get(&self) -> OrmResult<T>;

    fn get_multi(&self) -> OrmResult<Vec<T>>;
}

/// Statements that only report affected rows
pub trait Executor {
    fn exec(&self) -> OrmResult<ExecResult>;
}
