// Offset Valuer
//
// Writes each scanned value straight into the entity at the field's byte
// offset, through `raw::Accessor`.

use crate::catalog::{Entity, Model};
use crate::common::error::OrmResult;
use crate::driver::Rows;
use crate::valuer::raw::Accessor;
use crate::valuer::{scan_row, Valuer};

pub struct UnsafeValue<'a, E> {
    model: &'a Model,
    entity: &'a mut E,
}

impl<'a, E: Entity> UnsafeValue<'a, E> {
    pub fn new(model: &'a Model, entity: &'a mut E) -> Self {
        UnsafeValue { model, entity }
    }
}

impl<E: Entity> Valuer for UnsafeValue<'_, E> {
    fn set_columns(&mut self, rows: &mut dyn Rows) -> OrmResult<()> {
        // Checks the model before anything is scanned
        let mut accessor = Accessor::new(self.model, &mut *self.entity)?;
        for (field, value) in scan_row(self.model, rows)? {
            accessor.write(&field, value)?;
        }
        Ok(())
    }
}
