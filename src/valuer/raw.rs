// Raw Field Access
//
// Reads and writes entity fields through the byte offsets recorded in a
// model. This is the only module that does pointer arithmetic. Soundness
// rests on two facts checked or guaranteed before any access:
//   - the model was built from `E` (checked in `Accessor::new`), so every
//     offset belongs to `E`'s layout;
//   - `Entity` is an unsafe trait whose `fields()` reports the exact offset
//     and value type of each field, every field is aligned for its type
//     (`entity!` refuses packed layouts that break this), and each
//     `(scalar, nullable)` pair maps to exactly one Rust type.

use crate::catalog::{Entity, Field, Model};
use crate::common::error::{OrmError, OrmResult};
use crate::common::types::{DataValue, FieldType, ScalarType};
use crate::valuer::check_model;

/// Bind `$t` to the Rust type behind a value type and evaluate `$body`
macro_rules! with_field_type {
    ($vt:expr, $t:ident => $body:expr) => {{
        let vt = $vt;
        match (vt.scalar, vt.nullable) {
            (ScalarType::Bool, false) => { type $t = bool; $body }
            (ScalarType::Bool, true) => { type $t = Option<bool>; $body }
            (ScalarType::Int8, false) => { type $t = i8; $body }
            (ScalarType::Int8, true) => { type $t = Option<i8>; $body }
            (ScalarType::Int16, false) => { type $t = i16; $body }
            (ScalarType::Int16, true) => { type $t = Option<i16>; $body }
            (ScalarType::Int32, false) => { type $t = i32; $body }
            (ScalarType::Int32, true) => { type $t = Option<i32>; $body }
            (ScalarType::Int64, false) => { type $t = i64; $body }
            (ScalarType::Int64, true) => { type $t = Option<i64>; $body }
            (ScalarType::UInt8, false) => { type $t = u8; $body }
            (ScalarType::UInt8, true) => { type $t = Option<u8>; $body }
            (ScalarType::UInt16, false) => { type $t = u16; $body }
            (ScalarType::UInt16, true) => { type $t = Option<u16>; $body }
            (ScalarType::UInt32, false) => { type $t = u32; $body }
            (ScalarType::UInt32, true) => { type $t = Option<u32>; $body }
            (ScalarType::Float32, false) => { type $t = f32; $body }
            (ScalarType::Float32, true) => { type $t = Option<f32>; $body }
            (ScalarType::Float64, false) => { type $t = f64; $body }
            (ScalarType::Float64, true) => { type $t = Option<f64>; $body }
            (ScalarType::Text, false) => { type $t = String; $body }
            (ScalarType::Text, true) => { type $t = Option<String>; $body }
            (ScalarType::Blob, false) => { type $t = Vec<u8>; $body }
            (ScalarType::Blob, true) => { type $t = Option<Vec<u8>>; $body }
        }
    }};
}

/// Offset-based view over one borrowed entity
pub struct Accessor<'a, E> {
    model: &'a Model,
    entity: &'a mut E,
}

impl<'a, E: Entity> Accessor<'a, E> {
    /// Fails with `ModelMismatch` unless `model` describes `E`
    pub fn new(model: &'a Model, entity: &'a mut E) -> OrmResult<Self> {
        check_model::<E>(model)?;
        Ok(Accessor { model, entity })
    }

    /// Read a field by its declared name
    pub fn field(&self, name: &str) -> OrmResult<DataValue> {
        let field = self
            .model
            .field(name)
            .ok_or_else(|| OrmError::UnknownField(name.to_string()))?;
        let base = (&*self.entity as *const E).cast::<u8>();
        let value = with_field_type!(field.value_type(), T => {
            // SAFETY: the offset and type come from `E::fields()` for this
            // very `E`, so the pointer is in bounds, aligned and initialized.
            let slot = unsafe { &*base.add(field.offset()).cast::<T>() };
            slot.to_value()
        });
        Ok(value)
    }

    /// Write a field by its declared name, converting `value` first
    pub fn set_field(&mut self, name: &str, value: DataValue) -> OrmResult<()> {
        let model = self.model;
        let field = model
            .field(name)
            .ok_or_else(|| OrmError::UnknownField(name.to_string()))?;
        let value = value.cast(field.value_type())?;
        self.write(field, value)
    }

    /// Write an already converted value into `field`
    pub(crate) fn write(&mut self, field: &Field, value: DataValue) -> OrmResult<()> {
        let base = (&mut *self.entity as *mut E).cast::<u8>();
        with_field_type!(field.value_type(), T => {
            let converted = <T as FieldType>::from_value(value)?;
            // SAFETY: as in `field`; assignment drops the previous value,
            // which is always initialized because we hold `&mut E`.
            unsafe { *base.add(field.offset()).cast::<T>() = converted };
        });
        Ok(())
    }
}
