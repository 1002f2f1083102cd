// Registry Integration Tests
//
// Name derivation, tag handling, explicit options and concurrent first use
// of the metadata registry.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use bayunorm::common::{FieldType, ValueType};
use bayunorm::{ModelOpt, OrmError, Registry};

#[path = "../common/mod.rs"]
mod common;
use common::TestModel;

bayunorm::entity! {
    #[orm(table_name = "custom_table_name_t")]
    #[derive(Debug, Default)]
    struct CustomTableName {
        first_name: String,
    }
}

bayunorm::entity! {
    #[orm(table_name = "")]
    #[derive(Debug, Default)]
    struct EmptyTableName {
        first_name: String,
    }
}

fn columns(registry: &Registry) -> Result<Vec<(String, String, ValueType)>> {
    let model = registry.get::<&mut TestModel>()?;
    Ok(model
        .fields()
        .iter()
        .map(|f| (f.source_name().to_string(), f.column_name().to_string(), f.value_type()))
        .collect())
}

#[test]
fn test_registry_get_test_model() -> Result<()> {
    let registry = Registry::new();
    let model = registry.get::<&mut TestModel>()?;
    assert_eq!(model.table_name(), "test_model");
    assert_eq!(model.type_name(), "TestModel");
    assert_eq!(
        columns(&registry)?,
        vec![
            ("id".to_string(), "id".to_string(), <i64 as FieldType>::VALUE_TYPE),
            ("first_name".to_string(), "first_name".to_string(), <String as FieldType>::VALUE_TYPE),
            ("age".to_string(), "age".to_string(), <i8 as FieldType>::VALUE_TYPE),
            (
                "last_name".to_string(),
                "last_name".to_string(),
                <Option<String> as FieldType>::VALUE_TYPE
            ),
        ]
    );
    for field in model.fields() {
        let by_column = model.column(field.column_name()).expect("column index");
        assert!(Arc::ptr_eq(field, by_column));
    }
    assert_eq!(registry.len(), 1);
    Ok(())
}

#[test]
fn test_registry_rejects_non_pointers() -> Result<()> {
    let registry = Registry::new();
    assert_eq!(registry.get::<TestModel>().unwrap_err(), OrmError::NotAPointerToStruct);
    assert_eq!(
        registry.get::<HashMap<String, String>>().unwrap_err(),
        OrmError::NotAPointerToStruct
    );
    assert_eq!(registry.get::<Vec<i64>>().unwrap_err(), OrmError::NotAPointerToStruct);
    assert_eq!(registry.get::<i64>().unwrap_err(), OrmError::NotAPointerToStruct);
    assert_eq!(
        registry.get::<Box<Box<TestModel>>>().unwrap_err(),
        OrmError::NotAPointerToStruct
    );
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn test_registry_column_tags() -> Result<()> {
    {
        bayunorm::entity! {
            #[derive(Debug, Default)]
            struct TagTable {
                #[orm("column=first_name_t")]
                first_name: String,
            }
        }
        let registry = Registry::new();
        let model = registry.get::<&mut TagTable>()?;
        assert_eq!(model.table_name(), "tag_table");
        assert_eq!(model.field("first_name").map(|f| f.column_name()), Some("first_name_t"));
    }
    {
        bayunorm::entity! {
            #[derive(Debug, Default)]
            struct TagTable {
                #[orm("column=")]
                first_name: String,
            }
        }
        let registry = Registry::new();
        let model = registry.get::<&mut TagTable>()?;
        assert_eq!(model.field("first_name").map(|f| f.column_name()), Some("first_name"));
    }
    {
        bayunorm::entity! {
            #[derive(Debug, Default)]
            struct TagTable {
                #[orm("abc=abc")]
                first_name: String,
            }
        }
        let registry = Registry::new();
        let model = registry.get::<&mut TagTable>()?;
        assert_eq!(model.field("first_name").map(|f| f.column_name()), Some("first_name"));
    }
    {
        bayunorm::entity! {
            #[derive(Debug, Default)]
            struct TagTable {
                #[orm("column")]
                first_name: String,
            }
        }
        let registry = Registry::new();
        assert_eq!(
            registry.get::<&mut TagTable>().unwrap_err(),
            OrmError::InvalidTagContent("column".to_string())
        );
        assert!(registry.is_empty());
    }
    Ok(())
}

#[test]
fn test_registry_table_name_capability() -> Result<()> {
    let registry = Registry::new();
    assert_eq!(
        registry.get::<&mut CustomTableName>()?.table_name(),
        "custom_table_name_t"
    );
    assert_eq!(registry.get::<Box<EmptyTableName>>()?.table_name(), "empty_table_name");
    Ok(())
}

#[test]
fn test_registry_register_options() -> Result<()> {
    let registry = Registry::new();
    let model = registry.register::<&mut TestModel>(&[ModelOpt::table_name("test_model_tttt")])?;
    assert_eq!(model.table_name(), "test_model_tttt");

    let model = registry.register::<&mut TestModel>(&[ModelOpt::column_name(
        "first_name",
        "first_name_ccc",
    )])?;
    assert_eq!(model.table_name(), "test_model");
    assert_eq!(
        model.column("first_name_ccc").map(|f| f.source_name()),
        Some("first_name")
    );

    let err = registry
        .register::<&mut TestModel>(&[ModelOpt::column_name("XXX", "first_name_ccc")])
        .unwrap_err();
    assert_eq!(err, OrmError::UnknownField("XXX".to_string()));

    // the failed registration left the previous model in place
    let cached = registry.get::<&mut TestModel>()?;
    assert!(Arc::ptr_eq(&model, &cached));
    Ok(())
}

#[test]
fn test_registry_concurrent_first_use() -> Result<()> {
    let registry = Registry::new();
    let models = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|_| registry.get::<&mut TestModel>()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("registry thread panicked"))
            .collect::<Vec<_>>()
    })
    .expect("scope panicked");

    let first = models[0].clone()?;
    for model in models {
        assert!(Arc::ptr_eq(&first, &model?));
    }
    assert_eq!(registry.len(), 1);
    Ok(())
}
