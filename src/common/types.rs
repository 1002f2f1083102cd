// Value Types
//
// This module defines the values that flow between predicates, drivers and
// entity fields, and the type descriptors used to allocate scan slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::{OrmError, OrmResult};

/// A single SQL value: a bound argument or a column value read from a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, "NULL"),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            DataValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            DataValue::Blob(b) => write!(f, "X'{}'", hex::encode(b)),
        }
    }
}

/// Scalar kinds an entity field may have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    Float32,
    Float64,
    Text,
    Blob,
}

impl ScalarType {
    /// Inclusive bounds for the integer kinds
    pub fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            ScalarType::Int8 => Some((i8::MIN.into(), i8::MAX.into())),
            ScalarType::Int16 => Some((i16::MIN.into(), i16::MAX.into())),
            ScalarType::Int32 => Some((i32::MIN.into(), i32::MAX.into())),
            ScalarType::Int64 => Some((i64::MIN, i64::MAX)),
            ScalarType::UInt8 => Some((0, u8::MAX.into())),
            ScalarType::UInt16 => Some((0, u16::MAX.into())),
            ScalarType::UInt32 => Some((0, u32::MAX.into())),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "i8",
            ScalarType::Int16 => "i16",
            ScalarType::Int32 => "i32",
            ScalarType::Int64 => "i64",
            ScalarType::UInt8 => "u8",
            ScalarType::UInt16 => "u16",
            ScalarType::UInt32 => "u32",
            ScalarType::Float32 => "f32",
            ScalarType::Float64 => "f64",
            ScalarType::Text => "String",
            ScalarType::Blob => "Vec<u8>",
        };
        f.write_str(name)
    }
}

/// Type descriptor of an entity field.
///
/// Each `(scalar, nullable)` pair corresponds to exactly one Rust type, which
/// is what lets the offset scanner write through a raw pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType {
    pub scalar: ScalarType,
    pub nullable: bool,
}

impl ValueType {
    pub const fn new(scalar: ScalarType) -> Self {
        ValueType { scalar, nullable: false }
    }

    pub const fn nullable(self) -> Self {
        ValueType { nullable: true, ..self }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.scalar)
        } else {
            write!(f, "{}", self.scalar)
        }
    }
}

// 2^63 is exactly representable; every finite float below it and at or
// above -2^63 converts to i64 without saturating.
fn fits_i64(f: f64) -> bool {
    f >= i64::MIN as f64 && f < -(i64::MIN as f64)
}

// NaN and infinities are rejected along with finite values beyond f32::MAX
fn fits_f32(f: f64) -> bool {
    f.is_finite() && f.abs() <= f64::from(f32::MAX)
}

fn cast_error(value: &DataValue, target: ValueType) -> OrmError {
    OrmError::TypeError(format!("cannot convert {} into {}", value, target))
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Convert a raw driver value into the representation `target` accepts.
    ///
    /// Text parses into numbers and booleans, integers are range checked
    /// against the destination kind and NULL is only accepted when the
    /// destination is nullable.
    pub fn cast(self, target: ValueType) -> OrmResult<DataValue> {
        if self.is_null() {
            return if target.nullable {
                Ok(DataValue::Null)
            } else {
                Err(OrmError::TypeError(format!("cannot store NULL into {}", target)))
            };
        }

        match target.scalar {
            ScalarType::Bool => match self {
                DataValue::Boolean(b) => Ok(DataValue::Boolean(b)),
                DataValue::Integer(i) => Ok(DataValue::Boolean(i != 0)),
                DataValue::Text(ref s) => match s.trim().to_lowercase().as_str() {
                    "true" | "t" | "1" => Ok(DataValue::Boolean(true)),
                    "false" | "f" | "0" => Ok(DataValue::Boolean(false)),
                    _ => Err(cast_error(&self, target)),
                },
                other => Err(cast_error(&other, target)),
            },
            ScalarType::Float32 | ScalarType::Float64 => {
                let f = match self {
                    DataValue::Float(f) => f,
                    DataValue::Integer(i) => i as f64,
                    DataValue::Text(ref s) => s
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| cast_error(&self, target))?,
                    other => return Err(cast_error(&other, target)),
                };
                if target.scalar == ScalarType::Float32 && !fits_f32(f) {
                    return Err(OrmError::TypeError(format!("{} out of range for {}", f, target)));
                }
                Ok(DataValue::Float(f))
            }
            ScalarType::Text => match self {
                DataValue::Text(s) => Ok(DataValue::Text(s)),
                DataValue::Integer(i) => Ok(DataValue::Text(i.to_string())),
                DataValue::Float(f) => Ok(DataValue::Text(f.to_string())),
                DataValue::Boolean(b) => Ok(DataValue::Text(b.to_string())),
                DataValue::Blob(bytes) => String::from_utf8(bytes)
                    .map(DataValue::Text)
                    .map_err(|e| OrmError::TypeError(format!("blob is not valid UTF-8: {}", e))),
                DataValue::Null => Err(cast_error(&DataValue::Null, target)),
            },
            ScalarType::Blob => match self {
                DataValue::Blob(bytes) => Ok(DataValue::Blob(bytes)),
                DataValue::Text(s) => Ok(DataValue::Blob(s.into_bytes())),
                other => Err(cast_error(&other, target)),
            },
            integer => {
                let i = match self {
                    DataValue::Integer(i) => i,
                    DataValue::Boolean(b) => i64::from(b),
                    DataValue::Float(f) if f.fract() == 0.0 && fits_i64(f) => f as i64,
                    DataValue::Text(ref s) => s
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| cast_error(&self, target))?,
                    other => return Err(cast_error(&other, target)),
                };
                match integer.integer_range() {
                    Some((min, max)) if i >= min && i <= max => Ok(DataValue::Integer(i)),
                    _ => Err(OrmError::TypeError(format!("{} out of range for {}", i, target))),
                }
            }
        }
    }
}

/// A Rust type that can back an entity field.
pub trait FieldType: Sized {
    const VALUE_TYPE: ValueType;

    /// Convert a value already cast to `VALUE_TYPE` into the field type
    fn from_value(value: DataValue) -> OrmResult<Self>;

    fn to_value(&self) -> DataValue;
}

/// Non-nullable field types; `Option<T>` is their nullable form
pub trait ScalarField: FieldType {}

fn mismatch(value: &DataValue, target: ValueType) -> OrmError {
    OrmError::TypeError(format!("expected {} value, got {:?}", target, value))
}

macro_rules! integer_field {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const VALUE_TYPE: ValueType = ValueType::new(ScalarType::$scalar);

                fn from_value(value: DataValue) -> OrmResult<Self> {
                    match value {
                        DataValue::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                            OrmError::TypeError(format!("{} out of range for {}", i, stringify!($ty)))
                        }),
                        other => Err(mismatch(&other, Self::VALUE_TYPE)),
                    }
                }

                fn to_value(&self) -> DataValue {
                    DataValue::Integer(i64::from(*self))
                }
            }

            impl ScalarField for $ty {}
        )*
    };
}

integer_field! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
}

impl FieldType for bool {
    const VALUE_TYPE: ValueType = ValueType::new(ScalarType::Bool);

    fn from_value(value: DataValue) -> OrmResult<Self> {
        match value {
            DataValue::Boolean(b) => Ok(b),
            other => Err(mismatch(&other, Self::VALUE_TYPE)),
        }
    }

    fn to_value(&self) -> DataValue {
        DataValue::Boolean(*self)
    }
}

impl ScalarField for bool {}

impl FieldType for f64 {
    const VALUE_TYPE: ValueType = ValueType::new(ScalarType::Float64);

    fn from_value(value: DataValue) -> OrmResult<Self> {
        match value {
            DataValue::Float(f) => Ok(f),
            other => Err(mismatch(&other, Self::VALUE_TYPE)),
        }
    }

    fn to_value(&self) -> DataValue {
        DataValue::Float(*self)
    }
}

impl ScalarField for f64 {}

impl FieldType for f32 {
    const VALUE_TYPE: ValueType = ValueType::new(ScalarType::Float32);

    fn from_value(value: DataValue) -> OrmResult<Self> {
        match value {
            DataValue::Float(f) if fits_f32(f) => Ok(f as f32),
            DataValue::Float(f) => Err(OrmError::TypeError(format!("{} out of range for f32", f))),
            other => Err(mismatch(&other, Self::VALUE_TYPE)),
        }
    }

    fn to_value(&self) -> DataValue {
        DataValue::Float(f64::from(*self))
    }
}

impl ScalarField for f32 {}

impl FieldType for String {
    const VALUE_TYPE: ValueType = ValueType::new(ScalarType::Text);

    fn from_value(value: DataValue) -> OrmResult<Self> {
        match value {
            DataValue::Text(s) => Ok(s),
            other => Err(mismatch(&other, Self::VALUE_TYPE)),
        }
    }

    fn to_value(&self) -> DataValue {
        DataValue::Text(self.clone())
    }
}

impl ScalarField for String {}

impl FieldType for Vec<u8> {
    const VALUE_TYPE: ValueType = ValueType::new(ScalarType::Blob);

    fn from_value(value: DataValue) -> OrmResult<Self> {
        match value {
            DataValue::Blob(bytes) => Ok(bytes),
            other => Err(mismatch(&other, Self::VALUE_TYPE)),
        }
    }

    fn to_value(&self) -> DataValue {
        DataValue::Blob(self.clone())
    }
}

impl ScalarField for Vec<u8> {}

impl<T: ScalarField> FieldType for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE.nullable();

    fn from_value(value: DataValue) -> OrmResult<Self> {
        match value {
            DataValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn to_value(&self) -> DataValue {
        self.as_ref().map_or(DataValue::Null, T::to_value)
    }
}

macro_rules! into_data_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DataValue {
                fn from(value: $ty) -> Self {
                    DataValue::$variant(value.into())
                }
            }
        )*
    };
}

into_data_value! {
    i8 => Integer,
    i16 => Integer,
    i32 => Integer,
    i64 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    f32 => Float,
    f64 => Float,
    bool => Boolean,
    String => Text,
    &str => Text,
    Vec<u8> => Blob,
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}
