// Database Handle
//
// `Db` ties together the metadata registry, the driver connection and the
// rendering and scanning choices. Query builders borrow a handle.

use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::{Entity, Registry};
use crate::driver::Connection;
use crate::query::delete::Deleter;
use crate::query::dialect::Dialect;
use crate::query::select::Selector;
use crate::valuer::ScanStrategy;

/// Handle settings, usually deserialized from the application's config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub dialect: Dialect,
    pub scan_strategy: ScanStrategy,
}

#[derive(Clone)]
pub struct Db {
    registry: Arc<Registry>,
    conn: Arc<dyn Connection>,
    dialect: Dialect,
    scan_strategy: ScanStrategy,
}

impl Db {
    /// Open a handle with the default dialect and scan strategy
    pub fn open(conn: Arc<dyn Connection>) -> Self {
        Self::open_with(conn, DbConfig::default())
    }

    pub fn open_with(conn: Arc<dyn Connection>, config: DbConfig) -> Self {
        log::debug!(
            "Opening db handle: dialect={:?}, scan_strategy={:?}",
            config.dialect,
            config.scan_strategy
        );
        Db {
            registry: Arc::new(Registry::new()),
            conn,
            dialect: config.dialect,
            scan_strategy: config.scan_strategy,
        }
    }

    /// Share `registry` with other handles instead of a private one
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn connection(&self) -> &dyn Connection {
        self.conn.as_ref()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn scan_strategy(&self) -> ScanStrategy {
        self.scan_strategy
    }

    /// Start a SELECT over `T`
    pub fn select<T: Entity + Default>(&self) -> Selector<'_, T> {
        Selector::new(self)
    }

    /// Start a DELETE over `T`
    pub fn delete<T: Entity>(&self) -> Deleter<'_, T> {
        Deleter::new(self)
    }
}
