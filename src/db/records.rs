// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store for the repetition log.
//!
//! The presentation layer talks to the store directly; the metrics
//! aggregator never reads or writes records.

use crate::error::{AppError, Result};
use crate::models::record::sort_newest_first;
use crate::models::{NewRepetitionRecord, RepetitionRecord};
use async_trait::async_trait;
use dashmap::DashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Document store owning [`RepetitionRecord`]s.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<RepetitionRecord>>;

    /// Store a new record and return it with its assigned id.
    async fn insert(&self, record: NewRepetitionRecord) -> Result<RepetitionRecord>;

    /// Replace the timestamp and count of an existing record.
    async fn update(&self, record: &RepetitionRecord) -> Result<()>;

    /// Delete a record by id.
    async fn delete(&self, id: u64) -> Result<()>;
}

/// In-process record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: DashMap<u64, RepetitionRecord>,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing records, keeping their ids.
    ///
    /// Fails on duplicate ids, or when no id is left for the next insert.
    pub fn with_records(records: Vec<RepetitionRecord>) -> Result<Self> {
        let next_id = match records.iter().map(|r| r.id).max() {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                AppError::Storage(format!("record id {} leaves no id for new records", max))
            })?,
            None => 0,
        };

        let map = DashMap::with_capacity(records.len());
        for record in records {
            let id = record.id;
            if map.insert(id, record).is_some() {
                return Err(AppError::Storage(format!("duplicate record id {}", id)));
            }
        }

        Ok(Self {
            records: map,
            next_id: AtomicU64::new(next_id),
        })
    }

    /// Load records from a JSON array. Files written before the field rename
    /// (`pushups_number`) are accepted.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Storage(format!("Failed to read records: {}", e)))?;
        let records: Vec<RepetitionRecord> = serde_json::from_str(&json_data)
            .map_err(|e| AppError::Storage(format!("Failed to parse records: {}", e)))?;
        tracing::info!(count = records.len(), "Loaded repetition records");
        Self::with_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self) -> Result<Vec<RepetitionRecord>> {
        let mut records: Vec<RepetitionRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn insert(&self, record: NewRepetitionRecord) -> Result<RepetitionRecord> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = RepetitionRecord {
            id,
            timestamp: record.timestamp,
            count: record.count,
        };
        self.records.insert(id, stored.clone());
        tracing::debug!(id, count = stored.count, "Repetition record inserted");
        Ok(stored)
    }

    async fn update(&self, record: &RepetitionRecord) -> Result<()> {
        let mut existing = self
            .records
            .get_mut(&record.id)
            .ok_or_else(|| AppError::NotFound(format!("repetition record {}", record.id)))?;
        existing.timestamp = record.timestamp;
        existing.count = record.count;
        tracing::debug!(id = record.id, count = record.count, "Repetition record updated");
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.records
            .remove(&id)
            .map(|_| tracing::debug!(id, "Repetition record deleted"))
            .ok_or_else(|| AppError::NotFound(format!("repetition record {}", id)))
    }
}
