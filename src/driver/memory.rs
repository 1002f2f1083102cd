// In-Memory Driver
//
// A scripted connection that answers queries from a FIFO of prepared
// responses and records every statement it receives. Used by tests and
// benchmarks in place of a real database.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::common::error::{OrmError, OrmResult};
use crate::common::types::DataValue;
use crate::driver::{Connection, Rows, Slot};
use crate::query::types::{ExecResult, Query};

enum Response {
    Rows(MemoryRows),
    Error(String),
    Exec(ExecResult),
}

/// Connection that replays scripted responses in order
#[derive(Default)]
pub struct MemoryConnection {
    responses: Mutex<VecDeque<Response>>,
    executed: Mutex<Vec<Query>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next statement with a result set
    pub fn push_rows(&self, rows: MemoryRows) {
        self.responses.lock().push_back(Response::Rows(rows));
    }

    /// Fail the next statement with a driver error
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses.lock().push_back(Response::Error(message.into()));
    }

    /// Answer the next statement with an affected-row count
    pub fn push_exec(&self, rows_affected: u64) {
        self.responses
            .lock()
            .push_back(Response::Exec(ExecResult { rows_affected }));
    }

    /// Statements received so far, in order
    pub fn executed(&self) -> Vec<Query> {
        self.executed.lock().clone()
    }

    fn next_response(&self, sql: &str, args: &[DataValue]) -> OrmResult<Response> {
        self.executed
            .lock()
            .push(Query::new(sql.to_string(), args.to_vec()));
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| OrmError::Driver(format!("no response scripted for: {}", sql)))
    }
}

impl Connection for MemoryConnection {
    fn query(&self, sql: &str, args: &[DataValue]) -> OrmResult<Box<dyn Rows>> {
        match self.next_response(sql, args)? {
            Response::Rows(rows) => Ok(Box::new(rows)),
            Response::Error(message) => Err(OrmError::Driver(message)),
            Response::Exec(_) => Err(OrmError::Driver(format!("query answered with exec result: {}", sql))),
        }
    }

    fn exec(&self, sql: &str, args: &[DataValue]) -> OrmResult<ExecResult> {
        match self.next_response(sql, args)? {
            Response::Exec(result) => Ok(result),
            Response::Error(message) => Err(OrmError::Driver(message)),
            Response::Rows(_) => Err(OrmError::Driver(format!("exec answered with rows: {}", sql))),
        }
    }
}

/// Result set held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    columns: Vec<String>,
    rows: VecDeque<Vec<DataValue>>,
    current: Option<Vec<DataValue>>,
}

impl MemoryRows {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryRows {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: VecDeque::new(),
            current: None,
        }
    }

    /// Append a row; values are given in column order
    pub fn add_row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        self.rows.push_back(values.into_iter().map(Into::into).collect());
        self
    }

    /// Rows not yet consumed by `next_row`
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Rows for MemoryRows {
    fn columns(&self) -> OrmResult<Vec<String>> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> OrmResult<bool> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn scan(&mut self, dest: &mut [Slot]) -> OrmResult<()> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::Driver("scan called without a current row".to_string()))?;
        if row.len() != dest.len() {
            return Err(OrmError::Driver(format!(
                "expected {} destination slots in scan, not {}",
                row.len(),
                dest.len()
            )));
        }
        for (slot, value) in dest.iter_mut().zip(row) {
            slot.set(value.clone())?;
        }
        Ok(())
    }
}
