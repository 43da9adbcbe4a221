use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::QuestionRecord;

use super::store::QuestionStore;

/// Error loading the question corpus.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("the corpus must contain at least one question")]
    EmptyCorpus,
    #[error("question {index} has no accepted answers")]
    NoAcceptedAnswers { index: usize },
}

/// Load the question corpus from a JSON file.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<QuestionStore, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions: Vec<QuestionRecord> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate(&questions)?;

    Ok(QuestionStore::new(questions))
}

/// Check the corpus invariants: non-empty, and every question has at
/// least one accepted answer.
fn validate(questions: &[QuestionRecord]) -> Result<(), LoadError> {
    if questions.is_empty() {
        return Err(LoadError::EmptyCorpus);
    }

    for (index, question) in questions.iter().enumerate() {
        if question.accepted_answers().is_empty() {
            return Err(LoadError::NoAcceptedAnswers { index });
        }
    }

    Ok(())
}
