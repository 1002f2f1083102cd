use thiserror::Error;

/// Errors produced by the ORM core.
///
/// Every variant is terminal: callers are expected to fix the entity
/// definition, the predicate or the query instead of retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrmError {
    /// Registration was asked for anything other than a single-level pointer to a struct
    #[error("orm: only a single-level pointer to a struct is supported")]
    NotAPointerToStruct,
    /// An `orm` tag pair is not a well-formed `key=value`
    #[error("orm: invalid tag content: {0}")]
    InvalidTagContent(String),
    /// A predicate or model option names a field the entity does not have
    #[error("orm: unknown field: {0}")]
    UnknownField(String),
    /// A result set returned a column the entity does not map
    #[error("orm: unknown column: {0}")]
    UnknownColumn(String),
    /// The builder reached an expression shape it cannot render
    #[error("orm: unsupported expression: {0}")]
    UnsupportedExpression(String),
    /// `get` ran against an empty result set
    #[error("orm: no rows in result set")]
    NoRows,
    /// A driver value cannot be converted into the destination type
    #[error("orm: type error: {0}")]
    TypeError(String),
    /// A scanner was handed metadata that belongs to another entity type
    #[error("orm: model for {model} cannot scan into {entity}")]
    ModelMismatch { model: String, entity: String },
    /// Error surfaced by the driver collaborator
    #[error("orm: driver error: {0}")]
    Driver(String),
}

/// Result type used throughout the crate
pub type OrmResult<T> = Result<T, OrmError>;
