// Row Scanner Integration Tests
//
// Both scan strategies must produce the same entity for every input, and
// neither may leave a half-written entity behind on failure.

use anyhow::Result;
use bayunorm::driver::memory::MemoryRows;
use bayunorm::driver::Rows;
use bayunorm::valuer::Accessor;
use bayunorm::{DataValue, OrmError, OrmResult, Registry, ScanStrategy};

#[path = "../common/mod.rs"]
mod common;
use common::{test_model_rows, tom, tom_row, TestModel};

const STRATEGIES: [ScanStrategy; 2] = [ScanStrategy::Reflect, ScanStrategy::Unsafe];

fn scan_one(strategy: ScanStrategy, mut rows: MemoryRows, entity: &mut TestModel) -> OrmResult<()> {
    let registry = Registry::new();
    let model = registry.get::<&mut TestModel>()?;
    assert!(rows.next_row()?);
    strategy.valuer(&model, entity).set_columns(&mut rows)
}

#[test]
fn test_scan_full_row() -> Result<()> {
    for strategy in STRATEGIES {
        let mut entity = TestModel::default();
        scan_one(strategy, test_model_rows().add_row(tom_row()), &mut entity)?;
        assert_eq!(entity, tom(), "{:?}", strategy);
    }
    Ok(())
}

#[test]
fn test_scan_any_column_order() -> Result<()> {
    for strategy in STRATEGIES {
        let rows = MemoryRows::new(["last_name", "age", "id", "first_name"])
            .add_row(["Henry", "18", "1", "Tom"]);
        let mut entity = TestModel::default();
        scan_one(strategy, rows, &mut entity)?;
        assert_eq!(entity, tom(), "{:?}", strategy);
    }
    Ok(())
}

#[test]
fn test_scan_partial_columns() -> Result<()> {
    for strategy in STRATEGIES {
        let rows = MemoryRows::new(["first_name", "id"]).add_row(["Tom", "1"]);
        let mut entity = TestModel {
            age: 40,
            ..TestModel::default()
        };
        scan_one(strategy, rows, &mut entity)?;
        assert_eq!(
            entity,
            TestModel {
                id: 1,
                first_name: "Tom".to_string(),
                age: 40,
                last_name: None,
            },
            "{:?}",
            strategy
        );
    }
    Ok(())
}

#[test]
fn test_scan_null_into_nullable() -> Result<()> {
    for strategy in STRATEGIES {
        let rows = MemoryRows::new(["id", "last_name"]).add_row([DataValue::from("3"), DataValue::Null]);
        let mut entity = TestModel {
            last_name: Some("stale".to_string()),
            ..TestModel::default()
        };
        scan_one(strategy, rows, &mut entity)?;
        assert_eq!(entity.id, 3);
        assert_eq!(entity.last_name, None);
    }
    Ok(())
}

#[test]
fn test_scan_unknown_column() -> Result<()> {
    for strategy in STRATEGIES {
        let rows = MemoryRows::new(["id", "nickname"]).add_row(["1", "T"]);
        let mut entity = TestModel::default();
        let err = scan_one(strategy, rows, &mut entity).unwrap_err();
        assert_eq!(err, OrmError::UnknownColumn("nickname".to_string()));
        assert_eq!(entity, TestModel::default());
    }
    Ok(())
}

#[test]
fn test_scan_type_error_writes_nothing() -> Result<()> {
    let bad_rows = [
        ["1", "Tom", "300", "Henry"],
        ["ABC", "Tom", "18", "Henry"],
    ];
    for strategy in STRATEGIES {
        for row in bad_rows {
            let mut entity = TestModel::default();
            let err = scan_one(strategy, test_model_rows().add_row(row), &mut entity).unwrap_err();
            assert!(matches!(err, OrmError::TypeError(_)), "{:?}: {:?}", strategy, err);
            assert_eq!(entity, TestModel::default());
        }

        let rows = test_model_rows().add_row([
            DataValue::from("1"),
            DataValue::Null,
            DataValue::from("18"),
            DataValue::Null,
        ]);
        let mut entity = TestModel::default();
        assert!(matches!(
            scan_one(strategy, rows, &mut entity),
            Err(OrmError::TypeError(_))
        ));
        assert_eq!(entity, TestModel::default());
    }
    Ok(())
}

#[test]
fn test_scan_with_remapped_columns() -> Result<()> {
    let registry = Registry::new();
    let model = registry.register::<&mut TestModel>(&[bayunorm::ModelOpt::column_name(
        "first_name",
        "first_name_t",
    )])?;
    for strategy in STRATEGIES {
        let mut rows = MemoryRows::new(["first_name_t"]).add_row(["Tom"]);
        rows.next_row()?;
        let mut entity = TestModel::default();
        strategy.valuer(&model, &mut entity).set_columns(&mut rows)?;
        assert_eq!(entity.first_name, "Tom");
    }
    Ok(())
}

#[test]
fn test_accessor_reads_and_writes() -> Result<()> {
    let registry = Registry::new();
    let model = registry.get::<&mut TestModel>()?;
    let mut entity = tom();
    let mut accessor = Accessor::new(&model, &mut entity)?;

    assert_eq!(accessor.field("id")?, DataValue::Integer(1));
    assert_eq!(accessor.field("first_name")?, DataValue::Text("Tom".to_string()));
    assert_eq!(accessor.field("last_name")?, DataValue::Text("Henry".to_string()));
    assert_eq!(
        accessor.field("XXX").unwrap_err(),
        OrmError::UnknownField("XXX".to_string())
    );

    accessor.set_field("age", DataValue::Integer(19))?;
    accessor.set_field("last_name", DataValue::Null)?;
    accessor.set_field("first_name", DataValue::from("Jerry"))?;
    assert_eq!(
        entity,
        TestModel {
            id: 1,
            first_name: "Jerry".to_string(),
            age: 19,
            last_name: None,
        }
    );
    Ok(())
}

bayunorm::entity! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Pair {
        a: i64,
        b: i64,
        c: i64,
    }
}

// A hand-written shape can only point at a real entity description
struct PairAlias;

impl bayunorm::catalog::Reflect for PairAlias {
    fn shape() -> bayunorm::catalog::Shape {
        use bayunorm::catalog::Shape;
        Shape::Pointer(Box::new(Shape::of_entity::<Pair>()))
    }
}

#[test]
fn test_custom_shape_keeps_entity_layout() -> Result<()> {
    let registry = Registry::new();
    let aliased = registry.get::<PairAlias>()?;
    let model = registry.get::<&mut Pair>()?;
    assert!(std::sync::Arc::ptr_eq(&aliased, &model));

    let mut scanned = Vec::new();
    for strategy in STRATEGIES {
        let mut rows = MemoryRows::new(["a"]).add_row(["5"]);
        rows.next_row()?;
        let mut pair = Pair::default();
        strategy.valuer(&model, &mut pair).set_columns(&mut rows)?;
        scanned.push(pair);
    }
    assert_eq!(scanned[0], Pair { a: 5, b: 0, c: 0 });
    assert_eq!(scanned[0], scanned[1]);
    Ok(())
}

#[test]
fn test_scan_rejects_out_of_range_float() -> Result<()> {
    for strategy in STRATEGIES {
        let rows = MemoryRows::new(["id"]).add_row([DataValue::Float(1e30)]);
        let mut entity = TestModel::default();
        let err = scan_one(strategy, rows, &mut entity).unwrap_err();
        assert!(matches!(err, OrmError::TypeError(_)), "{:?}: {:?}", strategy, err);
        assert_eq!(entity, TestModel::default());
    }
    Ok(())
}
