//! Columnar trial table (Arrow/Parquet)
//!
//! Flattens the collated trial sequence into one Arrow `RecordBatch`, one
//! row per trial, for downstream tools that prefer columnar files over the
//! JSON export.
//!
//! **Append-Only Write Pattern**: a table is built in full from a session
//! list and written once; it is never updated row by row. Rebuild it after
//! the store changes.
//!
//! | Column | Type | Nullable |
//! |--------|------|----------|
//! | `participant_id` | Utf8 | no |
//! | `session_index` | UInt32 | no |
//! | `trial_index` | UInt64 | yes |
//! | `sentence` | Utf8 | yes |
//! | `condition` | Utf8 | yes |
//! | `expected` | Utf8 | yes |
//! | `response` | Utf8 | yes |
//! | `response_time_ms` | Float64 | yes |
//! | `correct` | Boolean | no |
//! | `timestamp` | Utf8 | yes |

use crate::session::{Condition, Judgment, SessionRecord, TrialCollator};
use crate::{Error, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray, UInt32Array,
    UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Arrow schema of the trial table.
#[must_use]
pub fn trial_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("participant_id", DataType::Utf8, false),
        Field::new("session_index", DataType::UInt32, false),
        Field::new("trial_index", DataType::UInt64, true),
        Field::new("sentence", DataType::Utf8, true),
        Field::new("condition", DataType::Utf8, true),
        Field::new("expected", DataType::Utf8, true),
        Field::new("response", DataType::Utf8, true),
        Field::new("response_time_ms", DataType::Float64, true),
        Field::new("correct", DataType::Boolean, false),
        Field::new("timestamp", DataType::Utf8, true),
    ]))
}

const fn judgment_name(judgment: Judgment) -> &'static str {
    match judgment {
        Judgment::Grammatical => "grammatical",
        Judgment::Ungrammatical => "ungrammatical",
    }
}

fn condition_name(condition: &Condition) -> &str {
    match condition {
        Condition::Known(id) => id.as_str(),
        Condition::Unknown(name) => name,
    }
}

/// One row per collated trial.
#[derive(Debug, Clone)]
pub struct TrialTable {
    batch: RecordBatch,
}

impl TrialTable {
    /// Build the table from sessions in store order.
    ///
    /// # Errors
    ///
    /// Returns error if the store holds more sessions than fit in `UInt32`
    /// or Arrow rejects the columns
    pub fn from_sessions<S: AsRef<SessionRecord>>(sessions: &[S]) -> Result<Self> {
        let collator = TrialCollator::new(sessions);
        let rows: Vec<_> = collator.trials().collect();

        let session_index = rows
            .iter()
            .map(|row| {
                u32::try_from(row.session_index).map_err(|_| {
                    Error::InvalidInput(format!(
                        "session index {} exceeds u32",
                        row.session_index
                    ))
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.participant_id).collect::<Vec<_>>(),
            )),
            Arc::new(UInt32Array::from(session_index)),
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.trial.trial_index()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.trial.sentence()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| r.trial.condition().map(condition_name))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| r.trial.expected().map(judgment_name))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| r.trial.response().map(judgment_name))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter()
                    .map(|r| r.trial.response_time_ms())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(BooleanArray::from(
                rows.iter().map(|r| r.trial.is_correct()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.trial.timestamp()).collect::<Vec<_>>(),
            )),
        ];

        let batch = RecordBatch::try_new(trial_schema(), columns)?;
        Ok(Self { batch })
    }

    /// Load a table previously written with [`TrialTable::write_parquet`].
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its schema is not the
    /// trial schema
    pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref()).map_err(|e| {
            Error::StorageError(format!("Failed to open Parquet file: {e}"))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::StorageError(format!("Failed to parse Parquet file: {e}"))
        })?;

        let reader = builder.build().map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet reader: {e}"))
        })?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                Error::StorageError(format!("Failed to read record batch: {e}"))
            })?;
            batches.push(batch);
        }

        let schema = trial_schema();
        if let Some(first) = batches.first() {
            if first.schema().fields() != schema.fields() {
                return Err(Error::StorageError(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    schema,
                    first.schema()
                )));
            }
        }

        let batch = arrow::compute::concat_batches(&schema, &batches)?;
        Ok(Self { batch })
    }

    /// Write the table as a single Parquet file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use parquet::arrow::ArrowWriter;
        use std::fs::File;

        let file = File::create(path.as_ref()).map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet file: {e}"))
        })?;

        let mut writer = ArrowWriter::try_new(file, self.batch.schema(), None).map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet writer: {e}"))
        })?;
        writer
            .write(&self.batch)
            .map_err(|e| Error::StorageError(format!("Failed to write record batch: {e}")))?;
        writer
            .close()
            .map_err(|e| Error::StorageError(format!("Failed to finish Parquet file: {e}")))?;

        info!(
            path = %path.as_ref().display(),
            rows = self.num_rows(),
            "trial table written"
        );
        Ok(())
    }

    /// Underlying record batch.
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of trials.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of correct trials, read from the `correct` column.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.batch
            .column_by_name("correct")
            .and_then(|c| c.as_any().downcast_ref::<BooleanArray>())
            .map_or(0, BooleanArray::true_count)
    }

    /// Number of trials without a known condition.
    #[must_use]
    pub fn missing_condition_count(&self) -> usize {
        self.batch
            .column_by_name("condition")
            .map_or(0, |c| c.null_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ConditionId, TrialRecord};

    fn sessions() -> Vec<SessionRecord> {
        vec![
            SessionRecord::new(
                "P1",
                vec![
                    TrialRecord::new(
                        1,
                        ConditionId::SimpleNonAmbiguous,
                        Judgment::Grammatical,
                        Some(Judgment::Grammatical),
                        800.0,
                    ),
                    TrialRecord::builder()
                        .trial_index(Some(2))
                        .condition(Some(Condition::parse("filler")))
                        .build(),
                ],
                "p1.json",
            ),
            SessionRecord::new(
                "P2",
                vec![TrialRecord::new(
                    1,
                    ConditionId::AmbiguousEasy,
                    Judgment::Ungrammatical,
                    Some(Judgment::Grammatical),
                    600.0,
                )],
                "p2.json",
            ),
        ]
    }

    #[test]
    fn test_table_rows_follow_collation() {
        let table = TrialTable::from_sessions(&sessions()).unwrap();
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.correct_count(), 1);
        assert_eq!(table.missing_condition_count(), 0);

        let ids = table
            .batch()
            .column_by_name("participant_id")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(ids.value(0), "P1");
        assert_eq!(ids.value(2), "P2");

        let conditions = table
            .batch()
            .column_by_name("condition")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(conditions.value(1), "filler");

        let times = table
            .batch()
            .column_by_name("response_time_ms")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(times.is_null(1));
    }

    #[test]
    fn test_empty_table() {
        let sessions: Vec<SessionRecord> = Vec::new();
        let table = TrialTable::from_sessions(&sessions).unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.batch().schema(), trial_schema());
    }

    #[test]
    fn test_parquet_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trials.parquet");

        let table = TrialTable::from_sessions(&sessions()).unwrap();
        table.write_parquet(&path).unwrap();

        let loaded = TrialTable::read_parquet(&path).unwrap();
        assert_eq!(loaded.num_rows(), 3);
        assert_eq!(loaded.correct_count(), table.correct_count());
    }

    #[test]
    fn test_read_missing_file() {
        let result = TrialTable::read_parquet("/nonexistent/trials.parquet");
        assert!(matches!(result, Err(Error::StorageError(_))));
    }
}
