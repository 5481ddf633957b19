// storage/mod.rs
// JSON Lines record store

mod log_file;
mod rewrite;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use log_file::{DeleteOutcome, RecordStore};
