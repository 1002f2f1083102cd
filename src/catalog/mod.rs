// Catalog Module
//
// Entity metadata: describes entity types, derives their table and column
// names and caches the resulting `Model` per type.

pub mod model;
pub mod naming;
pub mod reflect;

pub use self::model::{Field, Model};
pub use self::naming::underscore_name;
pub use self::reflect::{Entity, FieldInfo, Reflect, Shape, StructRef};

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::error::{OrmError, OrmResult};

/// Explicit configuration applied while a model is registered.
///
/// Options run after names have been derived and may override them.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOpt {
    /// Force the table name
    TableName(String),
    /// Remap the column of one field, addressed by its declared name
    ColumnName { field: String, column: String },
}

impl ModelOpt {
    pub fn table_name(name: impl Into<String>) -> Self {
        ModelOpt::TableName(name.into())
    }

    pub fn column_name(field: impl Into<String>, column: impl Into<String>) -> Self {
        ModelOpt::ColumnName {
            field: field.into(),
            column: column.into(),
        }
    }

    fn apply(&self, table_name: &mut String, fields: &mut [Field]) -> OrmResult<()> {
        match self {
            ModelOpt::TableName(name) => {
                *table_name = name.clone();
                Ok(())
            }
            ModelOpt::ColumnName { field, column } => {
                let target = fields
                    .iter_mut()
                    .find(|f| f.source_name() == field.as_str())
                    .ok_or_else(|| OrmError::UnknownField(field.clone()))?;
                target.set_column_name(column.clone());
                Ok(())
            }
        }
    }
}

/// Cache of entity metadata keyed by type.
///
/// Concurrent first lookups of one type may each parse it, but only the first
/// published model is kept, so every caller ends up sharing one `Arc<Model>`.
#[derive(Debug, Default)]
pub struct Registry {
    models: RwLock<HashMap<TypeId, Arc<Model>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Get the model for `P`, registering it on first use.
    ///
    /// `P` must be a single-level pointer to an entity (`&mut E` or `Box<E>`).
    pub fn get<P: Reflect + ?Sized>(&self) -> OrmResult<Arc<Model>> {
        let entity = P::shape().pointee_struct().ok_or(OrmError::NotAPointerToStruct)?;

        if let Some(model) = self.models.read().get(&entity.type_id) {
            return Ok(Arc::clone(model));
        }

        // Parsed outside the lock; a racing registration may do the same work.
        let parsed = Arc::new(parse_model(entity, &[])?);
        let mut models = self.models.write();
        let published = models.entry(entity.type_id).or_insert(parsed);
        log::debug!("Published model {} -> {}", entity.type_name, published.table_name());
        Ok(Arc::clone(published))
    }

    /// Parse `P` with explicit options and publish the result, replacing any
    /// cached model. Meant to run before the type is used by queries.
    pub fn register<P: Reflect + ?Sized>(&self, opts: &[ModelOpt]) -> OrmResult<Arc<Model>> {
        let entity = P::shape().pointee_struct().ok_or(OrmError::NotAPointerToStruct)?;
        let model = Arc::new(parse_model(entity, opts)?);
        self.models.write().insert(entity.type_id, Arc::clone(&model));
        log::debug!("Registered model {} -> {}", entity.type_name, model.table_name());
        Ok(model)
    }

    /// Number of cached models
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }
}

fn parse_model(entity: StructRef, opts: &[ModelOpt]) -> OrmResult<Model> {
    let declared = (entity.fields)();
    let mut fields = Vec::with_capacity(declared.len());
    for info in declared {
        let column = naming::column_name(info.name, info.tag)?;
        fields.push(Field::new(info.name.to_string(), column, info.value_type, info.offset));
    }

    let mut table_name = match (entity.table_name)() {
        Some(name) if !name.is_empty() => name,
        _ => underscore_name(entity.type_name),
    };

    for opt in opts {
        opt.apply(&mut table_name, &mut fields)?;
    }

    log::debug!("Parsed model {} with {} fields", entity.type_name, fields.len());
    Ok(Model::new(entity.type_id, entity.type_name, table_name, fields))
}
