#![cfg(feature = "sqlite")]

use dialect_table::prelude::*;
use rusqlite::Connection;
use tokio::runtime::Runtime;

fn text(s: &str) -> RowValues {
    RowValues::Text(s.to_string())
}

fn count_labels(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM labels", [], |r| r.get(0))
        .unwrap()
}

/// A writable table seeds one row, then the same connection is reopened read-only.
async fn seeded_read_only() -> Result<DialectTable<Connection>, DialectTableError> {
    let config = LabelTable::config(Dialect::Sqlite)?;
    let mut writer = DialectTable::builder(Connection::open_in_memory()?, config.clone())
        .create(true)
        .build()
        .await?;
    writer.resolve_or_create_id(&[text("seeded")]).await?;

    DialectTable::builder(writer.into_handle(), config)
        .read_only(true)
        .build()
        .await
}

#[test]
fn read_only_lookups_degrade_to_none() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut table = seeded_read_only().await?;
        assert!(table.is_read_only());

        assert_eq!(table.resolve_or_create_id(&[text("seeded")]).await?, Some(1));
        assert_eq!(table.resolve_or_create_id(&[text("absent")]).await?, None);
        assert_eq!(table.insert_row(&[text("absent")]).await?, None);
        assert_eq!(count_labels(table.handle()), 1);

        let row = table.get_by_id(1).await?.unwrap();
        assert_eq!(row.values(), &[text("seeded")]);
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn read_only_mutations_are_violations() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut table = seeded_read_only().await?;

        let err = table.update_row(1, &[text("changed")]).await.unwrap_err();
        assert!(matches!(
            err,
            DialectTableError::ReadOnlyViolation { operation: "update_row" }
        ));

        let err = table.delete_row(1).await.unwrap_err();
        assert!(matches!(
            err,
            DialectTableError::ReadOnlyViolation { operation: "delete_row" }
        ));

        // read-only is checked before arity on updates
        let err = table.update_row(1, &[]).await.unwrap_err();
        assert!(matches!(err, DialectTableError::ReadOnlyViolation { .. }));

        assert_eq!(count_labels(table.handle()), 1);
        let row = table.get_by_id(1).await?.unwrap();
        assert_eq!(row.values(), &[text("seeded")]);
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn read_only_insert_still_checks_arity() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut table = seeded_read_only().await?;
        let err = table.insert_row(&[text("a"), text("b")]).await.unwrap_err();
        assert!(matches!(err, DialectTableError::Arity { .. }));
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}
