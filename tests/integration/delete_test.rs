// Deleter Integration Tests

use anyhow::Result;
use bayunorm::query::{Query, QueryBuilder};
use bayunorm::{col, DataValue, Executor, OrmError};

#[path = "../common/mod.rs"]
mod common;
use common::{memory_db, TestModel};

#[test]
fn test_deleter_build() -> Result<()> {
    let (db, _conn) = memory_db();

    let query = db.delete::<TestModel>().build()?;
    assert_eq!(query, Query::new("DELETE FROM `test_model`;".to_string(), vec![]));

    let query = db.delete::<TestModel>().from("test_db.test_model").build()?;
    assert_eq!(query.sql(), "DELETE FROM test_db.test_model;");

    let query = db
        .delete::<TestModel>()
        .where_([col("age").eq(18).or(col("first_name").eq("Tom"))])
        .build()?;
    assert_eq!(
        query.sql(),
        "DELETE FROM `test_model` WHERE (`age` = ?) OR (`first_name` = ?);"
    );
    assert_eq!(
        query.args(),
        &[DataValue::Integer(18), DataValue::Text("Tom".to_string())]
    );
    Ok(())
}

#[test]
fn test_deleter_exec() -> Result<()> {
    let (db, conn) = memory_db();
    conn.push_exec(2);
    conn.push_error("connection reset");

    let deleter = db.delete::<TestModel>().where_([col("id").gt(10)]);
    assert_eq!(deleter.exec()?.rows_affected, 2);
    assert_eq!(
        deleter.exec().unwrap_err(),
        OrmError::Driver("connection reset".to_string())
    );

    let err = db.delete::<TestModel>().where_([col("XXX").eq(1)]).exec().unwrap_err();
    assert_eq!(err, OrmError::UnknownField("XXX".to_string()));

    let executed = conn.executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0].sql(), "DELETE FROM `test_model` WHERE `id` > ?;");
    Ok(())
}
