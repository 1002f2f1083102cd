// Entity Description
//
// Compile-time description of entity types. Entities describe their own
// fields (name, tag, value type, byte offset) so the registry never needs
// runtime reflection, and the `Shape` of a type lets the registry reject
// anything that is not a single-level pointer to a struct.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use crate::common::error::OrmResult;
use crate::common::types::{DataValue, FieldType, ValueType};

/// Declared field of an entity, as written in the struct definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field identifier in the struct
    pub name: &'static str,
    /// Raw `orm` tag, e.g. `column=first_name_t`
    pub tag: Option<&'static str>,
    pub value_type: ValueType,
    /// Byte offset of the field within the struct
    pub offset: usize,
}

/// Handle on a struct type that the registry can parse lazily.
///
/// Only [`Shape::of_entity`] builds one, so the type id and the field list
/// always come from the same `Entity` impl.
///
/// ```compile_fail
/// use std::any::TypeId;
/// use bayunorm::catalog::StructRef;
///
/// let forged = StructRef {
///     type_id: TypeId::of::<u8>(),
///     type_name: "u8",
///     fields: Vec::new,
///     table_name: || None,
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StructRef {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) fields: fn() -> Vec<FieldInfo>,
    pub(crate) table_name: fn() -> Option<String>,
}

impl StructRef {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Structural shape of a type
#[derive(Debug, Clone)]
pub enum Shape {
    Scalar(ValueType),
    Struct(StructRef),
    Pointer(Box<Shape>),
    Sequence(Box<Shape>),
    Map,
}

impl Shape {
    pub fn of_entity<E: Entity>() -> Shape {
        Shape::Struct(StructRef {
            type_id: TypeId::of::<E>(),
            type_name: E::TYPE_NAME,
            fields: E::fields,
            table_name: E::table_name,
        })
    }

    /// The struct a single-level pointer points at, if that is what this is
    pub fn pointee_struct(&self) -> Option<StructRef> {
        match self {
            Shape::Pointer(inner) => match inner.as_ref() {
                Shape::Struct(s) => Some(*s),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Types that can describe their shape to the registry
pub trait Reflect {
    fn shape() -> Shape;
}

/// A struct that maps to one table row.
///
/// # Safety
///
/// `fields()` must list fields of `Self` whose `offset` and `value_type`
/// exactly match the struct layout (`core::mem::offset_of!` and
/// `<FieldTy as FieldType>::VALUE_TYPE`). Every listed field must also be
/// properly aligned for its type inside any `&Self`, which rules out
/// `#[repr(packed)]` layouts that under-align a field. The offset scanner
/// creates references through those offsets. The `entity!` macro upholds
/// all of this and fails to compile on an under-aligned field.
pub unsafe trait Entity: Reflect + Sized + 'static {
    const TYPE_NAME: &'static str;

    fn fields() -> Vec<FieldInfo>;

    /// Naming capability: a non-empty name overrides the derived table name
    fn table_name() -> Option<String> {
        None
    }

    /// Assign a field addressed by its declared name
    fn set_field(&mut self, name: &str, value: DataValue) -> OrmResult<()>;
}

impl<T: Reflect + ?Sized> Reflect for &mut T {
    fn shape() -> Shape {
        Shape::Pointer(Box::new(T::shape()))
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn shape() -> Shape {
        Shape::Pointer(Box::new(T::shape()))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Reflect> Reflect for [T] {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}

impl<K, V> Reflect for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::Map
    }
}

impl<K, V> Reflect for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map
    }
}

macro_rules! scalar_reflect {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn shape() -> Shape {
                    Shape::Scalar(<$ty as FieldType>::VALUE_TYPE)
                }
            }
        )*
    };
}

scalar_reflect!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String);

/// Declare an entity struct and implement [`Entity`] and [`Reflect`] for it.
///
/// An optional leading `#[orm(table_name = ...)]` supplies the naming
/// capability; fields may carry an `#[orm("column=...")]` tag. Layouts that
/// leave a field under-aligned are rejected at compile time:
///
/// ```compile_fail
/// bayunorm::entity! {
///     #[repr(packed)]
///     #[derive(Default)]
///     pub struct Packed {
///         pub flag: u8,
///         pub name: String,
///     }
/// }
/// ```
///
/// ```
/// bayunorm::entity! {
///     #[orm(table_name = "users_t")]
///     #[derive(Debug, Default)]
///     pub struct User {
///         pub id: i64,
///         #[orm("column=name_t")]
///         pub name: String,
///         pub email: Option<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        @emit [$($table:tt)*]
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[orm($tag:literal)])?
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field : $fty, )*
        }

        impl $crate::catalog::Reflect for $name {
            fn shape() -> $crate::catalog::Shape {
                $crate::catalog::Shape::of_entity::<Self>()
            }
        }

        const _: () = {
            $(
                assert!(
                    ::core::mem::align_of::<$name>() % ::core::mem::align_of::<$fty>() == 0
                        && ::core::mem::offset_of!($name, $field) % ::core::mem::align_of::<$fty>() == 0,
                    concat!("entity field is under-aligned: ", stringify!($name), ".", stringify!($field)),
                );
            )*
        };

        unsafe impl $crate::catalog::Entity for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn fields() -> ::std::vec::Vec<$crate::catalog::FieldInfo> {
                ::std::vec![
                    $(
                        $crate::catalog::FieldInfo {
                            name: stringify!($field),
                            tag: None $( .or(Some($tag)) )?,
                            value_type: <$fty as $crate::common::FieldType>::VALUE_TYPE,
                            offset: ::core::mem::offset_of!($name, $field),
                        },
                    )*
                ]
            }

            fn table_name() -> ::std::option::Option<::std::string::String> {
                $($table)*
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::common::DataValue,
            ) -> $crate::common::OrmResult<()> {
                $(
                    if name == stringify!($field) {
                        self.$field = <$fty as $crate::common::FieldType>::from_value(value)?;
                        return Ok(());
                    }
                )*
                let _ = value;
                Err($crate::common::OrmError::UnknownField(name.to_string()))
            }
        }
    };
    (
        #[orm(table_name = $table:expr)]
        $($rest:tt)*
    ) => {
        $crate::entity! {
            @emit [Some(::std::string::String::from($table))]
            $($rest)*
        }
    };
    (
        $($rest:tt)*
    ) => {
        $crate::entity! {
            @emit [None]
            $($rest)*
        }
    };
}
