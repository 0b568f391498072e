//! question-forge: validation and maintenance of quiz question banks.
//!
//! A bank is a JSON document of chapters holding polymorphic questions.
//! This library loads banks, validates every question against its kind's
//! schema, and rewrites banks after removing placeholder content.

pub mod bank;
pub mod cli;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod utils;
pub mod validation;

pub use bank::{Chapter, QuestionBank};
pub use config::{BankConfig, ConfigError};
pub use error::BankError;
pub use validation::{QuestionBankValidator, ValidationReport};
