//! Utility functions for date and identifier formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{compact_date, digits};
