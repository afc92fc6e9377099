//! JSONL file writer for result records.
//!
//! Each record is serialized as one JSON line with a `record_type` field and
//! a `timestamp`, appended through a buffered writer. Opening in append mode
//! keeps earlier runs' lines intact.

use mad_application::{BaselineRecord, ResultSink};
use mad_domain::DebateRecord;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Result sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlResultSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlResultSink {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record_type: &str, record: &impl Serialize) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let line = match serde_json::to_value(record) {
            Ok(Value::Object(mut map)) => {
                map.insert("record_type".to_string(), Value::String(record_type.to_string()));
                map.insert("timestamp".to_string(), Value::String(timestamp));
                serde_json::to_string(&Value::Object(map))
            }
            Ok(other) => serde_json::to_string(&serde_json::json!({
                "record_type": record_type,
                "timestamp": timestamp,
                "data": other,
            })),
            Err(e) => Err(e),
        };
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize {} record: {}", record_type, e);
                return;
            }
        };

        let Ok(mut writer) = self.writer.lock() else {
            warn!("Result sink for {} is poisoned", self.path.display());
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Could not write result to {}: {}", self.path.display(), e);
        }
    }
}

impl ResultSink for JsonlResultSink {
    fn write_debate(&self, record: &DebateRecord) {
        self.append("debate", record);
    }

    fn write_baseline(&self, record: &BaselineRecord) {
        self.append("baseline", record);
    }
}

impl Drop for JsonlResultSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mad_domain::{
        BaselineAnswer, BaselineMethod, Choice, DebateFailure, DebateMode, DebateStep,
        FailureKind, LegalQuestion,
    };

    fn failed_record(id: &str) -> DebateRecord {
        let question = LegalQuestion::multiple_choice(
            id,
            "Q?",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        )
        .with_gold_answer(Choice::A);
        DebateRecord::failed(
            &question,
            DebateMode::IracHybrid,
            DebateFailure {
                step: DebateStep::Judgement,
                kind: FailureKind::InconsistentRuling,
                message: "winner mismatch".into(),
            },
        )
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results/run.jsonl");
        let sink = JsonlResultSink::new(&path).unwrap();

        sink.write_debate(&failed_record("q1"));
        sink.write_debate(&failed_record("q2"));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["record_type"], "debate");
        assert_eq!(lines[0]["question_id"], "q1");
        assert_eq!(lines[0]["outcome"]["status"], "failed");
        assert!(lines[0]["timestamp"].is_string());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");

        JsonlResultSink::new(&path).unwrap().write_debate(&failed_record("q1"));
        JsonlResultSink::new(&path).unwrap().write_debate(&failed_record("q2"));

        let ids: Vec<_> = read_lines(&path)
            .iter()
            .map(|l| l["question_id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[test]
    fn test_baseline_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.jsonl");
        let sink = JsonlResultSink::new(&path).unwrap();

        sink.write_baseline(&BaselineRecord::single(
            "q1",
            BaselineMethod::CotIrac,
            BaselineAnswer::Choice(Choice::B),
            Some(Choice::B),
        ));

        let lines = read_lines(&path);
        assert_eq!(lines[0]["record_type"], "baseline");
        assert_eq!(lines[0]["method"], "cot-irac");
        assert_eq!(lines[0]["answer"]["choice"], "B");
        assert_eq!(lines[0]["correct"], true);
    }
}
