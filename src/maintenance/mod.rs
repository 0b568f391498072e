//! Bank maintenance: placeholder removal and flashcard fixes.

pub mod clean;
pub mod placeholder;

pub use clean::{strip_flashcard_points, BankCleaner, ChapterCleanStats, CleanSummary};
pub use placeholder::PlaceholderFilter;
