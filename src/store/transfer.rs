// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Import/export of whole JSON documents.

use chrono::NaiveDate;
use serde_json::Value;

use super::{normalize_record_id, record_id, RawStorage, Record, Store, StoreError};
use crate::model::ids::random_token;
use crate::model::Map;

const EXPORT_SUFFIX_LEN: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub upserted: usize,
    /// Elements that were not objects or carried no usable id.
    pub skipped: usize,
}

/// Upserts a document (one record or an array of records) into `collection` and saves it.
///
/// Malformed JSON is rejected before anything is touched.
pub fn import_json<S: RawStorage>(
    store: &mut Store<S>,
    collection: &str,
    text: &str,
) -> Result<ImportReport, StoreError> {
    let document: Value = serde_json::from_str(text).map_err(|source| StoreError::Json {
        key: collection.to_owned(),
        source,
    })?;
    let records = match document {
        Value::Array(records) => records,
        record @ Value::Object(_) => vec![record],
        _ => {
            return Err(StoreError::InvalidRecord {
                collection: collection.to_owned(),
                reason: "expected an object or an array of objects".to_owned(),
            })
        }
    };

    let mut report = ImportReport::default();
    for mut record in records {
        normalize_record_id(&mut record);
        let Some(id) = record_id(&record)
            .filter(|id| !id.trim().is_empty())
            .map(str::to_owned)
        else {
            report.skipped += 1;
            continue;
        };
        store.upsert(collection, &id, record);
        report.upserted += 1;
    }

    tracing::info!(
        collection,
        upserted = report.upserted,
        skipped = report.skipped,
        "imported records"
    );
    store.save(collection)?;
    Ok(report)
}

/// Pretty JSON array of the whole collection; `None` when it is absent or empty.
pub fn export_collection<S: RawStorage>(
    store: &Store<S>,
    collection: &str,
) -> Result<Option<String>, StoreError> {
    let Some(records) = store.get_all(collection).filter(|records| !records.is_empty()) else {
        return Ok(None);
    };
    serde_json::to_string_pretty(records)
        .map(Some)
        .map_err(|source| StoreError::Json {
            key: collection.to_owned(),
            source,
        })
}

pub fn export_map(map: &Map) -> Result<String, StoreError> {
    let value = map.to_record()?;
    serde_json::to_string_pretty(&value).map_err(|source| StoreError::Json {
        key: map.id().to_string(),
        source,
    })
}

/// `<zone>_<name>.json`, with path separators replaced.
pub fn map_export_file_name(map: &Map) -> String {
    let stem = format!("{}_{}", map.zone(), map.name());
    format!("{}.json", file_safe(&stem))
}

/// `<collection>_<YYYY-MM-DD>_<random>.json`.
pub fn collection_export_file_name(collection: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.json",
        file_safe(collection),
        date.format("%Y-%m-%d"),
        random_token(EXPORT_SUFFIX_LEN)
    )
}

fn file_safe(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{
        collection_export_file_name, export_collection, export_map, import_json,
        map_export_file_name, ImportReport,
    };
    use crate::model::fixtures::east_road;
    use crate::model::Map;
    use crate::store::{MemoryStorage, Record, Store};

    fn store() -> Store<MemoryStorage> {
        Store::new(MemoryStorage::new())
    }

    #[test]
    fn imports_array_and_renames_legacy_ids() {
        let mut store = store();
        let text = json!([
            { "_id": "a", "name": "A" },
            { "id": "b", "name": "B" },
            { "name": "no id" },
            42
        ])
        .to_string();

        let report = import_json(&mut store, "maps", &text).expect("import");

        assert_eq!(
            report,
            ImportReport {
                upserted: 2,
                skipped: 2
            }
        );
        let a = store.get_by_id("maps", "a").expect("a");
        assert_eq!(a, &json!({ "id": "a", "name": "A" }));
        assert!(store.storage().get("maps").is_some());
    }

    #[test]
    fn imports_single_object_as_upsert() {
        let mut store = store();
        store.upsert("maps", "a", json!({ "id": "a", "name": "old" }));

        import_json(&mut store, "maps", r#"{ "_id": "a", "name": "new" }"#).expect("import");

        let all = store.get_all("maps").expect("maps");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["name"], "new");
    }

    #[test]
    fn malformed_import_touches_nothing() {
        let mut store = store();
        store.upsert("maps", "a", json!({ "id": "a" }));

        assert!(import_json(&mut store, "maps", "[{ not json").is_err());
        assert!(import_json(&mut store, "maps", "\"text\"").is_err());

        assert_eq!(store.get_all("maps").map(<[_]>::len), Some(1));
        assert!(store.storage().get("maps").is_none());
    }

    #[test]
    fn export_skips_empty_collections() {
        let mut store = store();
        assert_eq!(export_collection(&store, "maps").expect("export"), None);

        store.upsert("maps", "a", json!({ "id": "a" }));
        let text = export_collection(&store, "maps").expect("export").expect("text");
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(parsed, json!([{ "id": "a" }]));
    }

    #[test]
    fn exported_map_decodes_again() {
        let map = east_road();
        let text = export_map(&map).expect("export");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");

        assert_eq!(Map::from_record(&value).expect("decode").places(), map.places());
    }

    #[test]
    fn export_file_names() {
        let mut map = east_road();
        map.set_name("Old/Road");
        assert_eq!(map_export_file_name(&map), "town_Old_Road.json");

        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        let name = collection_export_file_name("maps", date);
        assert!(name.starts_with("maps_2024-03-09_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "maps_2024-03-09_".len() + 8 + ".json".len());
    }
}
