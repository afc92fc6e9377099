//! JSONL question reader.
//!
//! One [`LegalQuestion`] per line. Blank lines and `#` comments are
//! skipped; any other unreadable line stops the read with its line number.

use mad_domain::LegalQuestion;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum QuestionReadError {
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}:{line}: duplicate question id '{id}'", .path.display())]
    DuplicateId {
        path: PathBuf,
        line: usize,
        id: String,
    },
}

/// Read every question in `path`, in file order.
pub async fn read_questions(path: impl AsRef<Path>) -> Result<Vec<LegalQuestion>, QuestionReadError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| QuestionReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let questions = parse_questions(path, &content)?;
    debug!("Read {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

fn parse_questions(path: &Path, content: &str) -> Result<Vec<LegalQuestion>, QuestionReadError> {
    let mut seen = HashSet::new();
    let mut questions = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let question: LegalQuestion =
            serde_json::from_str(trimmed).map_err(|source| QuestionReadError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
        if !seen.insert(question.id.clone()) {
            return Err(QuestionReadError::DuplicateId {
                path: path.to_path_buf(),
                line: index + 1,
                id: question.id,
            });
        }
        questions.push(question);
    }
    Ok(questions)
}
