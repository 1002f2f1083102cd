// Common Definitions
//
// Error taxonomy and value types shared by every other module.

pub mod error;
pub mod types;

pub use self::error::{OrmError, OrmResult};
pub use self::types::{DataValue, FieldType, ScalarField, ScalarType, ValueType};
