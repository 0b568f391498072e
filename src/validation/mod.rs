//! Question bank validation.
//!
//! Validation is layered: document envelope checks, then per question a
//! structural pass, kind-specific content checks and quality checks. Every
//! layer returns findings; [`QuestionBankValidator`] merges them into a
//! [`ValidationReport`].

pub mod content;
pub mod duplicates;
pub mod envelope;
pub mod finding;
pub mod quality;
pub mod report;
pub mod schema;
pub mod structure;
pub mod validator;

pub use duplicates::{IdIndex, QuestionLocation};
pub use finding::{Finding, FindingCategory, Severity};
pub use report::ValidationReport;
pub use schema::{Difficulty, QuestionKind, SchemaRegistry};
pub use structure::{QuestionHeader, NO_ID};
pub use validator::{QuestionBankValidator, QuestionOutcome};
