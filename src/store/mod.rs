// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyed record collections with JSON persistence.
//!
//! A `Store` keeps named collections of JSON records in memory and reads/writes each
//! collection as one JSON array through a `RawStorage`. In-memory state is authoritative:
//! failed loads leave it untouched and failed saves do not roll it back.
//!
//! Records are matched by their `id` field. Files from older tools spell it `_id`; those are
//! renamed by `normalize_record_id` whenever records enter the store.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

mod map_codec;
mod storage;
pub mod transfer;

pub use map_codec::MAPS_COLLECTION;
pub use storage::{FileStorage, MemoryStorage, RawStorage, WriteDurability};

pub const ID_FIELD: &str = "id";
pub const LEGACY_ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid json for {key}: {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },
    #[error("stored {key} is not a JSON array")]
    NotAnArray { key: String },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
    #[error("invalid storage key {key:?}")]
    InvalidKey { key: String },
    #[error("invalid record in {collection}: {reason}")]
    InvalidRecord { collection: String, reason: String },
}

/// Outcome of `Store::load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { records: usize },
    /// Nothing stored under the key (or an empty value).
    Missing,
    /// Unreadable or malformed; the in-memory collection was left as it was.
    Failed,
}

impl LoadStatus {
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Exact-equality filter over top-level record fields. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: BTreeMap<String, Value>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn matches(&self, record: &Value) -> bool {
        if self.fields.is_empty() {
            return true;
        }
        let Some(object) = record.as_object() else {
            return false;
        };
        self.fields
            .iter()
            .all(|(key, expected)| object.get(key) == Some(expected))
    }
}

/// One page window plus the number of matches before slicing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.total.div_ceil(page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Typed view over a store collection.
pub trait Record: Sized {
    const COLLECTION: &'static str;

    fn record_id(&self) -> &str;
    fn to_record(&self) -> Result<Value, StoreError>;
    fn from_record(value: &Value) -> Result<Self, StoreError>;
}

/// Renames a top-level `_id` to `id`. When both are present `id` wins and `_id` is dropped.
/// Returns whether the record changed.
pub fn normalize_record_id(record: &mut Value) -> bool {
    let Some(object) = record.as_object_mut() else {
        return false;
    };
    let Some(legacy) = object.remove(LEGACY_ID_FIELD) else {
        return false;
    };
    if !object.contains_key(ID_FIELD) {
        object.insert(ID_FIELD.to_owned(), legacy);
    }
    true
}

pub fn record_id(record: &Value) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

#[derive(Debug)]
pub struct Store<S> {
    storage: S,
    collections: BTreeMap<String, Vec<Value>>,
}

impl<S: RawStorage> Store<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            collections: BTreeMap::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.collections.keys().map(String::as_str)
    }

    /// Replaces the in-memory collection with the stored one.
    ///
    /// Absent, empty, unreadable or malformed input leaves the collection exactly as it was.
    pub fn load(&mut self, collection: &str) -> LoadStatus {
        let text = match self.storage.read_raw(collection) {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::debug!(collection, "nothing stored");
                return LoadStatus::Missing;
            }
            Err(err) => {
                tracing::warn!(collection, error = %err, "failed to read collection");
                return LoadStatus::Failed;
            }
        };

        match parse_collection(collection, &text) {
            Ok(records) => {
                let count = records.len();
                self.collections.insert(collection.to_owned(), records);
                tracing::debug!(collection, records = count, "loaded collection");
                LoadStatus::Loaded { records: count }
            }
            Err(err) => {
                tracing::warn!(collection, error = %err, "ignoring malformed collection");
                LoadStatus::Failed
            }
        }
    }

    /// Writes one collection. An absent collection is a no-op.
    pub fn save(&mut self, collection: &str) -> Result<(), StoreError> {
        let Some(records) = self.collections.get(collection) else {
            tracing::debug!(collection, "nothing to save");
            return Ok(());
        };
        let result = serde_json::to_string(records)
            .map_err(|source| StoreError::Json {
                key: collection.to_owned(),
                source,
            })
            .and_then(|text| self.storage.write_raw(collection, &text));
        match &result {
            Ok(()) => tracing::debug!(collection, records = records.len(), "saved collection"),
            Err(err) => tracing::error!(collection, error = %err, "failed to save collection"),
        }
        result
    }

    /// Writes every collection; keeps going after a failure and reports the first one.
    pub fn save_all(&mut self) -> Result<(), StoreError> {
        let names = self.collections.keys().cloned().collect::<Vec<_>>();
        let mut first_error = None;
        for name in names {
            if let Err(err) = self.save(&name) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Replaces the record with `id` in place, or appends it. Creates the collection.
    ///
    /// A legacy `_id` is renamed, then the object's `id` is set to `id` so the record stays
    /// reachable through `get_by_id`.
    pub fn upsert(&mut self, collection: &str, id: &str, mut record: Value) {
        normalize_record_id(&mut record);
        if let Some(object) = record.as_object_mut() {
            object.insert(ID_FIELD.to_owned(), Value::String(id.to_owned()));
        }
        let records = self.collections.entry(collection.to_owned()).or_default();
        match records.iter_mut().find(|r| record_id(r) == Some(id)) {
            Some(slot) => *slot = record,
            None => records.push(record),
        }
    }

    pub fn delete_by_id(&mut self, collection: &str, id: &str) -> bool {
        let Some(records) = self.collections.get_mut(collection) else {
            return false;
        };
        match records.iter().position(|r| record_id(r) == Some(id)) {
            Some(idx) => {
                records.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drops the collection and clears its stored value.
    pub fn delete_all(&mut self, collection: &str) -> Result<(), StoreError> {
        self.collections.remove(collection);
        let result = self.storage.write_raw(collection, "");
        if let Err(err) = &result {
            tracing::error!(collection, error = %err, "failed to clear collection");
        }
        result
    }

    pub fn get_by_id(&self, collection: &str, id: &str) -> Option<&Value> {
        self.collections
            .get(collection)?
            .iter()
            .find(|r| record_id(r) == Some(id))
    }

    pub fn get_all(&self, collection: &str) -> Option<&[Value]> {
        self.collections.get(collection).map(Vec::as_slice)
    }

    pub fn get_one(&self, collection: &str, query: &Query) -> Option<&Value> {
        self.collections
            .get(collection)?
            .iter()
            .find(|r| query.matches(r))
    }

    pub fn query(&self, collection: &str, query: &Query) -> Vec<&Value> {
        self.collections
            .get(collection)
            .map(|records| records.iter().filter(|r| query.matches(r)).collect())
            .unwrap_or_default()
    }

    /// Zero-based page of the matches. A zero page size or a page past the end yields no
    /// items; `total` is always the full match count.
    pub fn paginate(
        &self,
        collection: &str,
        query: &Query,
        page: usize,
        page_size: usize,
    ) -> Page<&Value> {
        let matches = self.query(collection, query);
        let total = matches.len();
        let items = match page.checked_mul(page_size) {
            Some(start) if page_size > 0 && start < total => matches
                .into_iter()
                .skip(start)
                .take(page_size)
                .collect(),
            _ => Vec::new(),
        };
        Page { items, total }
    }

    /// Upserts a typed record into its collection (no save).
    pub fn put<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let value = record.to_record()?;
        self.upsert(R::COLLECTION, record.record_id(), value);
        Ok(())
    }

    pub fn fetch<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.get_by_id(R::COLLECTION, id)
            .map(R::from_record)
            .transpose()
    }

    pub fn fetch_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.get_all(R::COLLECTION)
            .unwrap_or_default()
            .iter()
            .map(R::from_record)
            .collect()
    }

    pub fn fetch_page<R: Record>(
        &self,
        query: &Query,
        page: usize,
        page_size: usize,
    ) -> Result<Page<R>, StoreError> {
        let page = self.paginate(R::COLLECTION, query, page, page_size);
        let items = page
            .items
            .into_iter()
            .map(R::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total: page.total,
        })
    }
}

fn parse_collection(collection: &str, text: &str) -> Result<Vec<Value>, StoreError> {
    let value: Value = serde_json::from_str(text).map_err(|source| StoreError::Json {
        key: collection.to_owned(),
        source,
    })?;
    let Value::Array(mut records) = value else {
        return Err(StoreError::NotAnArray {
            key: collection.to_owned(),
        });
    };
    for record in &mut records {
        normalize_record_id(record);
    }
    Ok(records)
}
