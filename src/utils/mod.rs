//! Shared utility functions for question-forge.

pub mod json_values;

pub use json_values::{count_value, integer_value, is_blank, is_positive_number, json_type_name};
