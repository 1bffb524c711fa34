// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The map collection as seen by a map list: create, edit, delete, search, import/export.
//!
//! `MapLibrary` owns the store and the editor config, and announces every change on its
//! `EventBus<LibraryEvent>`.

use thiserror::Error;

use crate::config::EditorConfig;
use crate::events::{EventBus, LibraryEvent};
use crate::model::{Map, MapId, MapKind};
use crate::session::{EditSession, SessionError};
use crate::store::transfer::{self, ImportReport};
use crate::store::{Page, Query, RawStorage, Store, StoreError, MAPS_COLLECTION};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("map {0} not found")]
    NotFound(MapId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Input of `MapLibrary::create_map`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMap {
    pub name: String,
    /// Defaults to `"default"`.
    pub zone: Option<String>,
    pub kind: MapKind,
    pub description: Option<String>,
}

/// Exact-match filters; blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSearch {
    pub zone: Option<String>,
    pub name: Option<String>,
}

impl MapSearch {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        for (field, value) in [("zone", &self.zone), ("name", &self.name)] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                query.insert(field, value);
            }
        }
        query
    }
}

#[derive(Debug)]
pub struct MapLibrary<S> {
    store: Store<S>,
    config: EditorConfig,
    events: EventBus<LibraryEvent>,
}

impl<S: RawStorage> MapLibrary<S> {
    /// Wraps `storage` and loads the map collection from it.
    pub fn open(storage: S, config: EditorConfig) -> Self {
        let mut store = Store::new(storage);
        let status = store.load(MAPS_COLLECTION);
        tracing::debug!(?status, "opened map library");
        Self {
            store,
            config,
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn events_mut(&mut self) -> &mut EventBus<LibraryEvent> {
        &mut self.events
    }

    pub fn create_map(&mut self, new_map: NewMap) -> Result<Map, LibraryError> {
        let name = new_map.name.trim();
        if name.is_empty() {
            return Err(LibraryError::Validation("map name must not be empty"));
        }

        let mut map = Map::new(name);
        if let Some(zone) = new_map.zone.as_deref().map(str::trim).filter(|z| !z.is_empty()) {
            map.set_zone(zone);
        }
        map.set_kind(new_map.kind);
        map.set_description(new_map.description);
        let spacing = self.config.default_spacing();
        map.set_spacing(spacing);
        map.touch();

        self.store.put(&map)?;
        self.store.save(MAPS_COLLECTION)?;
        tracing::info!(map_id = %map.id(), name = map.name(), zone = map.zone(), "created map");
        self.events.emit(&LibraryEvent::Added(map.id().clone()));
        Ok(map)
    }

    /// Replaces a stored map. Unknown ids are rejected; use `create_map` for new maps.
    pub fn update_map(&mut self, map: &Map) -> Result<(), LibraryError> {
        if map.name().trim().is_empty() {
            return Err(LibraryError::Validation("map name must not be empty"));
        }
        if self
            .store
            .get_by_id(MAPS_COLLECTION, map.id().as_str())
            .is_none()
        {
            return Err(LibraryError::NotFound(map.id().clone()));
        }

        let mut map = map.clone();
        map.touch();
        self.store.put(&map)?;
        self.store.save(MAPS_COLLECTION)?;
        tracing::info!(map_id = %map.id(), "updated map");
        self.events.emit(&LibraryEvent::Updated(map.id().clone()));
        Ok(())
    }

    /// Deletes a map together with its places. Returns whether it existed.
    pub fn delete_map(&mut self, map_id: &MapId) -> Result<bool, LibraryError> {
        if !self.store.delete_by_id(MAPS_COLLECTION, map_id.as_str()) {
            return Ok(false);
        }
        self.store.save(MAPS_COLLECTION)?;
        tracing::info!(map_id = %map_id, "deleted map");
        self.events.emit(&LibraryEvent::Deleted(map_id.clone()));
        Ok(true)
    }

    pub fn get_map(&self, map_id: &MapId) -> Result<Option<Map>, LibraryError> {
        Ok(self.store.fetch::<Map>(map_id.as_str())?)
    }

    /// Zero-based page of maps matching `search`, sized by the configured page size.
    pub fn search(&self, search: &MapSearch, page: usize) -> Result<Page<Map>, LibraryError> {
        Ok(self
            .store
            .fetch_page::<Map>(&search.to_query(), page, self.config.page_size)?)
    }

    pub fn import_json(&mut self, text: &str) -> Result<ImportReport, LibraryError> {
        let report = transfer::import_json(&mut self.store, MAPS_COLLECTION, text)?;
        self.events.emit(&LibraryEvent::Imported {
            upserted: report.upserted,
        });
        Ok(report)
    }

    pub fn export_all(&self) -> Result<Option<String>, LibraryError> {
        Ok(transfer::export_collection(&self.store, MAPS_COLLECTION)?)
    }

    pub fn open_session(&self, map_id: &MapId) -> Result<EditSession, LibraryError> {
        let map = self
            .get_map(map_id)?
            .ok_or_else(|| LibraryError::NotFound(map_id.clone()))?;
        Ok(EditSession::open(map, &self.config))
    }

    pub fn save_session(&mut self, session: &mut EditSession) -> Result<Map, LibraryError> {
        if session.map().name().trim().is_empty() {
            return Err(LibraryError::Validation("map name must not be empty"));
        }
        let map = session.save(&mut self.store)?;
        tracing::info!(map_id = %map.id(), places = map.places().len(), "saved map");
        self.events.emit(&LibraryEvent::Updated(map.id().clone()));
        Ok(map)
    }
}
