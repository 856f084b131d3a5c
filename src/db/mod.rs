//! Repetition record storage.

pub mod records;

pub use records::{MemoryRecordStore, RecordStore};
