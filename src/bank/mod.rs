//! The question bank document: loading, saving and aggregate metadata.

mod document;
mod metadata;

pub use document::{Chapter, CourseInfo, QuestionBank, TOTAL_QUESTIONS_KEY};
pub use metadata::{
    BankDistribution, ChapterCount, Metadata, DEFAULT_BANK_VERSION, DIFFICULTY_DISTRIBUTION_KEY,
    GENERATED_DATE_KEY, LAST_UPDATED_KEY, QUESTIONS_BY_CHAPTER_KEY, QUESTION_TYPES_KEY,
    VERSION_KEY,
};
