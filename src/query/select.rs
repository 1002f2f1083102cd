// SELECT Statements
//
// `Selector` renders `SELECT * FROM <table>[ WHERE ...];` for one entity type
// and runs it through the handle's connection, scanning rows into entities.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::catalog::{Entity, Model};
use crate::common::error::{OrmError, OrmResult};
use crate::db::Db;
use crate::query::ast::Predicate;
use crate::query::builder::Builder;
use crate::query::types::{Querier, Query, QueryBuilder};

pub struct Selector<'a, T> {
    db: &'a Db,
    table: Option<String>,
    predicates: Vec<Predicate>,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: Entity + Default> Selector<'a, T> {
    pub fn new(db: &'a Db) -> Self {
        Selector {
            db,
            table: None,
            predicates: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Override the table; written raw, so `db.table` works. An empty name
    /// restores the model's table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.table = if table.is_empty() { None } else { Some(table) };
        self
    }

    /// Replace the WHERE predicates; they are joined with `AND`
    pub fn where_(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates = predicates.into_iter().collect();
        self
    }

    fn prepare(&self) -> OrmResult<(Arc<Model>, Query)> {
        let model = self.db.registry().get::<&mut T>()?;
        let mut builder = Builder::new(&model, self.db.dialect());
        builder.write_str("SELECT * FROM ");
        builder.write_table(self.table.as_deref());
        builder.build_where(&self.predicates)?;
        let query = builder.finish();
        Ok((model, query))
    }
}

impl<T: Entity + Default> QueryBuilder for Selector<'_, T> {
    fn build(&self) -> OrmResult<Query> {
        self.prepare().map(|(_, query)| query)
    }
}

impl<T: Entity + Default> Querier<T> for Selector<'_, T> {
    fn get(&self) -> OrmResult<T> {
        let (model, query) = self.prepare()?;
        log::debug!("Executing query: {}", query.sql());
        let mut rows = self.db.connection().query(query.sql(), query.args())?;
        if !rows.next_row()? {
            return Err(OrmError::NoRows);
        }

        let mut entity = T::default();
        self.db
            .scan_strategy()
            .valuer(&model, &mut entity)
            .set_columns(&mut *rows)?;
        Ok(entity)
    }

    fn get_multi(&self) -> OrmResult<Vec<T>> {
        let (model, query) = self.prepare()?;
        log::debug!("Executing query: {}", query.sql());
        let mut rows = self.db.connection().query(query.sql(), query.args())?;

        let strategy = self.db.scan_strategy();
        let mut entities = Vec::new();
        while rows.next_row()? {
            let mut entity = T::default();
            strategy.valuer(&model, &mut entity).set_columns(&mut *rows)?;
            entities.push(entity);
        }
        Ok(entities)
    }
}
