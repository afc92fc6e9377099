//! Question input files

mod jsonl_questions;

pub use jsonl_questions::{QuestionReadError, read_questions};
