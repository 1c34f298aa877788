use std::sync::Arc;

use async_trait::async_trait;
use dialect_table::prelude::*;
use tokio::runtime::Runtime;

/// Records every statement and answers like a minimal backend.
#[derive(Default)]
struct RecordingHandle {
    log: Vec<String>,
    rows: Vec<(RowId, Vec<RowValues>)>,
    next_id: RowId,
    tracks_rowid: bool,
    last_rowid: Option<RowId>,
    fail_on: Option<&'static str>,
}

impl RecordingHandle {
    fn sequence_backed() -> Self {
        Self::default()
    }

    fn rowid_backed() -> Self {
        Self {
            tracks_rowid: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl DbHandle for RecordingHandle {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DialectTableError> {
        self.log.push(sql.to_string());
        if sql.starts_with("INSERT") {
            self.next_id += 1;
            self.rows.push((self.next_id, params.to_vec()));
            if self.tracks_rowid {
                self.last_rowid = Some(self.next_id);
            }
            return Ok(1);
        }
        Ok(0)
    }

    async fn query_first(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, DialectTableError> {
        self.log.push(sql.to_string());
        let cols = Arc::new(vec!["id".to_string()]);
        if sql.contains("CURRVAL") {
            return Ok(Some(CustomDbRow::new(cols, vec![RowValues::Int(self.next_id)])));
        }
        let found = self
            .rows
            .iter()
            .find(|(_, values)| values.as_slice() == params)
            .map(|(id, _)| CustomDbRow::new(cols, vec![RowValues::Int(*id)]));
        Ok(found)
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DialectTableError> {
        self.log.push(sql.to_string());
        match self.fail_on {
            Some(needle) if sql.contains(needle) => {
                Err(DialectTableError::ExecutionError(format!("failed: {sql}")))
            }
            _ => Ok(()),
        }
    }

    fn last_insert_rowid(&self) -> Option<RowId> {
        self.last_rowid
    }
}

fn label(s: &str) -> RowValues {
    RowValues::Text(s.to_string())
}

#[test]
fn sequence_dialect_reads_currval_right_after_insert() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Postgres)?;
        let mut table = DialectTable::builder(RecordingHandle::sequence_backed(), config)
            .build()
            .await?;

        assert_eq!(table.resolve_or_create_id(&[label("alpha")]).await?, Some(1));
        assert_eq!(table.insert_row(&[label("beta")]).await?, Some(2));

        let log = &table.handle().log;
        assert_eq!(
            log,
            &vec![
                "SELECT id FROM labels WHERE label = $1".to_string(),
                "INSERT INTO labels (label) VALUES ($1)".to_string(),
                "SELECT CURRVAL('labels_seq')".to_string(),
                "INSERT INTO labels (label) VALUES ($1)".to_string(),
                "SELECT CURRVAL('labels_seq')".to_string(),
            ]
        );
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn rowid_dialect_issues_no_extra_statement() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Sqlite)?;
        let mut table = DialectTable::builder(RecordingHandle::rowid_backed(), config)
            .build()
            .await?;

        assert_eq!(table.resolve_or_create_id(&[label("alpha")]).await?, Some(1));
        assert_eq!(table.resolve_or_create_id(&[label("alpha")]).await?, Some(1));
        assert_eq!(table.handle().log.len(), 3);
        assert!(table.handle().log.iter().all(|sql| !sql.contains("CURRVAL")));
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn rowid_dialect_on_a_handle_without_rowids_is_an_error() -> Result<(), Box<dyn std::error::Error>>
{
    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Sqlite)?;
        let mut table = DialectTable::builder(RecordingHandle::sequence_backed(), config)
            .build()
            .await?;

        let err = table.insert_row(&[label("alpha")]).await.unwrap_err();
        assert!(matches!(err, DialectTableError::ExecutionError(_)));
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn update_binds_data_then_id() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Postgres)?;
        let mut table = DialectTable::builder(RecordingHandle::sequence_backed(), config)
            .build()
            .await?;
        table.update_row(7, &[label("x")]).await?;
        assert_eq!(
            table.handle().log,
            vec!["UPDATE labels SET label = $1 WHERE id = $2".to_string()]
        );
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn reset_drops_in_order_then_creates() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Postgres)?;
        let table = DialectTable::builder(RecordingHandle::sequence_backed(), config.clone())
            .reset(true)
            .build()
            .await?;

        let expected: Vec<String> = config
            .statements()
            .drop_schema
            .iter()
            .chain(config.statements().create_schema.iter())
            .cloned()
            .collect();
        assert_eq!(table.handle().log, expected);
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn schema_failure_stops_the_list() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Postgres)?;
        let mut handle = RecordingHandle::sequence_backed();
        handle.fail_on = Some("CREATE TABLE");

        let err = DialectTable::builder(&mut handle, config)
            .create(true)
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DialectTableError::ExecutionError(_)));
        // the sequence was created, the table attempted, the index never reached
        assert_eq!(handle.log.len(), 2);
        assert!(handle.log[0].starts_with("CREATE SEQUENCE"));
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}

#[test]
fn non_integer_ids_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    struct TextIdHandle;

    #[async_trait]
    impl DbHandle for TextIdHandle {
        async fn execute(&mut self, _: &str, _: &[RowValues]) -> Result<usize, DialectTableError> {
            Ok(0)
        }

        async fn query_first(
            &mut self,
            _: &str,
            _: &[RowValues],
        ) -> Result<Option<CustomDbRow>, DialectTableError> {
            Ok(Some(CustomDbRow::new(
                Arc::new(vec!["id".to_string()]),
                vec![RowValues::Text("not-an-id".into())],
            )))
        }

        async fn execute_batch(&mut self, _: &str) -> Result<(), DialectTableError> {
            Ok(())
        }

        fn last_insert_rowid(&self) -> Option<RowId> {
            None
        }
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let config = LabelTable::config(Dialect::Postgres)?;
        let mut table = DialectTable::builder(TextIdHandle, config).build().await?;
        let err = table
            .resolve_or_create_id(&[label("alpha")])
            .await
            .unwrap_err();
        assert!(matches!(err, DialectTableError::ExecutionError(_)));
        Ok::<(), DialectTableError>(())
    })?;
    Ok(())
}
