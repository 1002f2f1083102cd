// Name-Addressed Valuer
//
// Assigns each scanned value through `Entity::set_field`, which matches the
// field by its declared name. Fully safe; pays a name comparison per field.

use crate::catalog::{Entity, Model};
use crate::common::error::OrmResult;
use crate::driver::Rows;
use crate::valuer::{check_model, scan_row, Valuer};

pub struct ReflectValue<'a, E> {
    model: &'a Model,
    entity: &'a mut E,
}

impl<'a, E: Entity> ReflectValue<'a, E> {
    pub fn new(model: &'a Model, entity: &'a mut E) -> Self {
        ReflectValue { model, entity }
    }
}

impl<E: Entity> Valuer for ReflectValue<'_, E> {
    fn set_columns(&mut self, rows: &mut dyn Rows) -> OrmResult<()> {
        check_model::<E>(self.model)?;
        for (field, value) in scan_row(self.model, rows)? {
            self.entity.set_field(field.source_name(), value)?;
        }
        Ok(())
    }
}
