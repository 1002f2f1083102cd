// Row Scanners
//
// A valuer copies the current row of a result set into one entity instance.
// Two strategies exist and behave identically: `ReflectValue` assigns fields
// through the entity's name-addressed setter, `UnsafeValue` writes through
// the byte offsets recorded in the model.

pub mod raw;
pub mod reflect;
pub mod unsafe_value;

pub use self::raw::Accessor;
pub use self::reflect::ReflectValue;
pub use self::unsafe_value::UnsafeValue;

use std::any::TypeId;
use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::{Entity, Field, Model};
use crate::common::error::{OrmError, OrmResult};
use crate::common::types::DataValue;
use crate::driver::{Rows, Slot};

/// Copies the current row into the entity the valuer was created for
pub trait Valuer {
    /// Scan the current row of `rows`.
    ///
    /// Nothing is written to the entity unless every column resolves and
    /// every value converts to its field's type.
    fn set_columns(&mut self, rows: &mut dyn Rows) -> OrmResult<()>;
}

/// Which valuer a handle creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    Reflect,
    #[default]
    Unsafe,
}

impl ScanStrategy {
    pub fn valuer<'a, E: Entity>(self, model: &'a Model, entity: &'a mut E) -> Box<dyn Valuer + 'a> {
        match self {
            ScanStrategy::Reflect => Box::new(ReflectValue::new(model, entity)),
            ScanStrategy::Unsafe => Box::new(UnsafeValue::new(model, entity)),
        }
    }
}

/// Fail unless `model` was built from `E`
pub(crate) fn check_model<E: Entity>(model: &Model) -> OrmResult<()> {
    if model.type_id() == TypeId::of::<E>() {
        Ok(())
    } else {
        Err(OrmError::ModelMismatch {
            model: model.type_name().to_string(),
            entity: E::TYPE_NAME.to_string(),
        })
    }
}

/// Resolve the result columns, allocate one typed slot per column and fill
/// them all with a single driver call.
pub(crate) fn scan_row(model: &Model, rows: &mut dyn Rows) -> OrmResult<Vec<(Arc<Field>, DataValue)>> {
    let columns = rows.columns()?;
    let mut fields = Vec::with_capacity(columns.len());
    let mut slots = Vec::with_capacity(columns.len());
    for name in &columns {
        let field = model
            .column(name)
            .ok_or_else(|| OrmError::UnknownColumn(name.clone()))?;
        slots.push(Slot::new(field.value_type()));
        fields.push(Arc::clone(field));
    }

    rows.scan(&mut slots)?;

    Ok(fields
        .into_iter()
        .zip(slots.into_iter().map(Slot::into_value))
        .collect())
}
