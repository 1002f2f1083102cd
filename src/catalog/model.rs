// Entity Metadata
//
// A Model is the resolved table and column mapping of one entity type. It
// keeps two indexes (by field name and by column name) over one shared set
// of Field entries and is never mutated once published.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::types::ValueType;

/// Mapping of one entity field to one table column
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    source_name: String,
    column_name: String,
    value_type: ValueType,
    offset: usize,
}

impl Field {
    pub(crate) fn new(source_name: String, column_name: String, value_type: ValueType, offset: usize) -> Self {
        Field {
            source_name,
            column_name,
            value_type,
            offset,
        }
    }

    /// Field name as declared in the entity struct
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Resolved column name
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Byte offset inside the entity; only the offset scanner reads it
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn set_column_name(&mut self, column: String) {
        self.column_name = column;
    }
}

/// Resolved metadata for one entity type
#[derive(Debug)]
pub struct Model {
    type_id: TypeId,
    type_name: &'static str,
    table_name: String,
    fields: Vec<Arc<Field>>,
    by_field: HashMap<String, Arc<Field>>,
    by_column: HashMap<String, Arc<Field>>,
}

impl Model {
    /// Build both indexes from one list of fields.
    ///
    /// When two fields share a column name the later one owns the column
    /// index entry.
    pub(crate) fn new(type_id: TypeId, type_name: &'static str, table_name: String, fields: Vec<Field>) -> Self {
        let fields: Vec<Arc<Field>> = fields.into_iter().map(Arc::new).collect();
        let mut by_field = HashMap::with_capacity(fields.len());
        let mut by_column = HashMap::with_capacity(fields.len());
        for field in &fields {
            by_field.insert(field.source_name.clone(), Arc::clone(field));
            if let Some(previous) = by_column.insert(field.column_name.clone(), Arc::clone(field)) {
                log::warn!(
                    "{}: fields {} and {} both map to column {}; {} wins",
                    type_name,
                    previous.source_name,
                    field.source_name,
                    field.column_name,
                    field.source_name
                );
            }
        }
        Model {
            type_id,
            type_name,
            table_name,
            fields,
            by_field,
            by_column,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Name of the entity type this model was built from
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Look up a field by its declared name
    pub fn field(&self, source_name: &str) -> Option<&Arc<Field>> {
        self.by_field.get(source_name)
    }

    /// Look up a field by its column name
    pub fn column(&self, column_name: &str) -> Option<&Arc<Field>> {
        self.by_column.get(column_name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
            && self.table_name == other.table_name
            && self.fields == other.fields
    }
}
