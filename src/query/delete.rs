// DELETE Statements
//
// `Deleter` renders `DELETE FROM <table>[ WHERE ...];` and executes it.

use std::marker::PhantomData;

use crate::catalog::Entity;
use crate::common::error::OrmResult;
use crate::db::Db;
use crate::query::ast::Predicate;
use crate::query::builder::Builder;
use crate::query::types::{ExecResult, Executor, Query, QueryBuilder};

pub struct Deleter<'a, T> {
    db: &'a Db,
    table: Option<String>,
    predicates: Vec<Predicate>,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: Entity> Deleter<'a, T> {
    pub fn new(db: &'a Db) -> Self {
        Deleter {
            db,
            table: None,
            predicates: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Same rules as `Selector::from`
    pub fn from(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.table = if table.is_empty() { None } else { Some(table) };
        self
    }

    pub fn where_(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates = predicates.into_iter().collect();
        self
    }
}

impl<T: Entity> QueryBuilder for Deleter<'_, T> {
    fn build(&self) -> OrmResult<Query> {
        let model = self.db.registry().get::<&mut T>()?;
        let mut builder = Builder::new(&model, self.db.dialect());
        builder.write_str("DELETE FROM ");
        builder.write_table(self.table.as_deref());
        builder.build_where(&self.predicates)?;
        Ok(builder.finish())
    }
}

impl<T: Entity> Executor for Deleter<'_, T> {
    fn exec(&self) -> OrmResult<ExecResult> {
        let query = self.build()?;
        log::debug!("Executing statement: {}", query.sql());
        self.db.connection().exec(query.sql(), query.args())
    }
}
