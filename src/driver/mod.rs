// Driver Interface
//
// The ORM core never talks to a database itself. A driver implements
// `Connection` to execute SQL and `Rows` to walk a result set, filling the
// typed slots the row scanners allocate.

pub mod memory;

use crate::common::error::OrmResult;
use crate::common::types::{DataValue, ValueType};
use crate::query::types::ExecResult;

/// Cursor over a result set, one row at a time
pub trait Rows {
    /// Column names of the current result set, in result order
    fn columns(&self) -> OrmResult<Vec<String>>;

    /// Advance to the next row; `false` once the set is exhausted
    fn next_row(&mut self) -> OrmResult<bool>;

    /// Fill one slot per column of the current row, in column order
    fn scan(&mut self, dest: &mut [Slot]) -> OrmResult<()>;
}

/// Executes SQL on behalf of the query builders
pub trait Connection: Send + Sync {
    fn query(&self, sql: &str, args: &[DataValue]) -> OrmResult<Box<dyn Rows>>;

    fn exec(&self, sql: &str, args: &[DataValue]) -> OrmResult<ExecResult>;
}

/// Typed destination for one column value.
///
/// Values stored through [`Slot::set`] are converted to the slot's type, so a
/// filled slot always holds something its field type accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    value_type: ValueType,
    value: DataValue,
}

impl Slot {
    pub fn new(value_type: ValueType) -> Self {
        Slot {
            value_type,
            value: DataValue::Null,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    pub fn set(&mut self, raw: DataValue) -> OrmResult<()> {
        self.value = raw.cast(self.value_type)?;
        Ok(())
    }

    pub(crate) fn into_value(self) -> DataValue {
        self.value
    }
}
