// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session over one map.
//!
//! The session owns a working copy of the map's places plus a selection set. Every edge change
//! goes through `crate::graph`, so reciprocity holds after each public operation. Nothing is
//! persisted until `save`.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::config::{EditorConfig, PlaceStyle};
use crate::graph;
use crate::model::{Direction, Map, MapKind, Place, PlaceId, Position, Spacing, Teleport};
use crate::store::{RawStorage, Store, StoreError, MAPS_COLLECTION};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown place {0}")]
    UnknownPlace(PlaceId),
    #[error("place {0} already exists")]
    DuplicatePlace(PlaceId),
    #[error("place {0} cannot connect to itself")]
    SelfConnection(PlaceId),
    #[error("place {0} cannot teleport to itself")]
    TeleportToSelf(PlaceId),
    #[error("invalid map settings: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of `EditSession::create_adjacent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjacent {
    /// The slot was already taken; selection moved there.
    Existing(PlaceId),
    Created(PlaceId),
}

impl Adjacent {
    pub fn id(&self) -> &PlaceId {
        match self {
            Self::Existing(id) | Self::Created(id) => id,
        }
    }
}

/// Partial update of a place's editable fields. Text fields are trimmed; a blank
/// description, argument or color clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub custom_args: Option<String>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub pulse_animation: Option<bool>,
}

/// Partial update of the map metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSettings {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub kind: Option<MapKind>,
    pub description: Option<String>,
    pub custom_args: Option<String>,
    /// Non-positive values are ignored.
    pub spacing_x: Option<f32>,
    pub spacing_y: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    /// Map metadata; its place list stays empty while the session owns the places.
    map: Map,
    places: Vec<Place>,
    selected: BTreeSet<PlaceId>,
    style: PlaceStyle,
    default_spacing: Spacing,
}

impl EditSession {
    pub fn open(map: Map, config: &EditorConfig) -> Self {
        let mut session = Self {
            map: Map::with_id(map.id().clone(), map.name()),
            places: Vec::new(),
            selected: BTreeSet::new(),
            style: config.place_style.clone(),
            default_spacing: config.default_spacing(),
        };
        session.load_map(map);
        session
    }

    /// Replaces the working copy with `map`. Unusable spacing falls back to the configured
    /// default and every place is re-normalized.
    fn load_map(&mut self, mut map: Map) {
        let spacing = map.spacing();
        map.set_spacing(Spacing::new(spacing.x, spacing.y).unwrap_or(self.default_spacing));
        let mut places = map.take_places();
        for place in &mut places {
            place.normalize(&self.style);
        }
        tracing::debug!(map_id = %map.id(), places = places.len(), "opened map");
        self.map = map;
        self.places = places;
        self.selected.clear();
    }

    /// Metadata of the edited map. Places live in `places()`.
    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn place(&self, place_id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|place| place.id() == place_id)
    }

    pub fn place_by_name(&self, name: &str) -> Option<&Place> {
        self.places.iter().find(|place| place.name() == name)
    }

    fn index(&self, place_id: &PlaceId) -> Result<usize, SessionError> {
        graph::index_of(&self.places, place_id)
            .ok_or_else(|| SessionError::UnknownPlace(place_id.clone()))
    }

    /// Appends a place (a default one when `initial` is `None`).
    ///
    /// Neighbor slots of `initial` are dropped; edges are made with `connect_directional`. A
    /// place without position is put at the origin.
    pub fn add_place(
        &mut self,
        initial: Option<Place>,
        auto_select: bool,
    ) -> Result<PlaceId, SessionError> {
        let mut place = initial.unwrap_or_else(|| Place::new("", &self.style));
        if self.place(place.id()).is_some() {
            return Err(SessionError::DuplicatePlace(place.id().clone()));
        }
        place.set_neighbors(Default::default());
        if place.position().is_none() {
            place.set_position(Some(Position::default()));
        }
        place.normalize(&self.style);

        let place_id = place.id().clone();
        self.places.push(place);
        if auto_select {
            self.selected.insert(place_id.clone());
        }
        tracing::debug!(place_id = %place_id, "added place");
        Ok(place_id)
    }

    /// Unlinks the place from all neighbors, then drops it. `None` if it is unknown.
    pub fn remove_place(&mut self, place_id: &PlaceId) -> Option<Place> {
        let idx = graph::index_of(&self.places, place_id)?;
        let unlinked = graph::detach(&mut self.places, idx);
        self.selected.remove(place_id);
        tracing::debug!(place_id = %place_id, unlinked, "removed place");
        Some(self.places.remove(idx))
    }

    /// Break-then-make connect: afterwards `src` and `dst` share exactly the edge `dir`, and
    /// the two slots involved no longer point anywhere else.
    pub fn connect_directional(
        &mut self,
        src: &PlaceId,
        dst: &PlaceId,
        dir: Direction,
    ) -> Result<(), SessionError> {
        if src == dst {
            return Err(SessionError::SelfConnection(src.clone()));
        }
        let src_idx = self.index(src)?;
        let dst_idx = self.index(dst)?;
        graph::connect_exclusive(&mut self.places, src_idx, dst_idx, dir);
        tracing::debug!(src = %src, dst = %dst, %dir, "connected places");
        Ok(())
    }

    /// Removes any edge between `a` and `b`. Returns whether one existed.
    pub fn disconnect(&mut self, a: &PlaceId, b: &PlaceId) -> Result<bool, SessionError> {
        let a_idx = self.index(a)?;
        let b_idx = self.index(b)?;
        let Some((a_place, b_place)) = graph::pair_mut(&mut self.places, a_idx, b_idx) else {
            return Ok(false);
        };
        let was_connected = graph::are_connected(a_place, b_place);
        graph::disconnect(a_place, b_place);
        Ok(was_connected)
    }

    /// Walks from `src` towards `dir`: an existing neighbor is reused, otherwise a copy of
    /// `src` is placed one spacing step away and connected. Selection moves to the result.
    pub fn create_adjacent(
        &mut self,
        src: &PlaceId,
        dir: Direction,
    ) -> Result<Adjacent, SessionError> {
        let src_idx = self.index(src)?;
        let source = &self.places[src_idx];

        let existing = graph::get_edge(source, dir)
            .filter(|neighbor| graph::index_of(&self.places, neighbor).is_some())
            .cloned();
        if let Some(existing) = existing {
            self.select_only(existing.clone());
            return Ok(Adjacent::Existing(existing));
        }

        let spacing = self.map.spacing();
        let mut place = source.clone_display();
        place.set_position(Some(
            source.position().unwrap_or_default() + dir.offset(spacing.x, spacing.y),
        ));
        place.normalize(&self.style);

        let place_id = place.id().clone();
        self.places.push(place);
        let new_idx = self.places.len() - 1;
        graph::connect_exclusive(&mut self.places, src_idx, new_idx, dir);
        self.select_only(place_id.clone());
        tracing::debug!(src = %src, place_id = %place_id, %dir, "created adjacent place");
        Ok(Adjacent::Created(place_id))
    }

    fn select_only(&mut self, place_id: PlaceId) {
        self.selected.clear();
        self.selected.insert(place_id);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_all(&mut self) {
        self.selected = self.places.iter().map(|place| place.id().clone()).collect();
    }

    pub fn set_selected(&mut self, place_id: &PlaceId, selected: bool) -> Result<(), SessionError> {
        self.index(place_id)?;
        if selected {
            self.selected.insert(place_id.clone());
        } else {
            self.selected.remove(place_id);
        }
        Ok(())
    }

    /// Flips the selection flag; returns the new state.
    pub fn toggle_selected(&mut self, place_id: &PlaceId) -> Result<bool, SessionError> {
        let selected = !self.is_selected(place_id);
        self.set_selected(place_id, selected)?;
        Ok(selected)
    }

    pub fn is_selected(&self, place_id: &PlaceId) -> bool {
        self.selected.contains(place_id)
    }

    /// The selected place that comes last in place order.
    pub fn selected_one(&self) -> Option<&Place> {
        self.places
            .iter()
            .rev()
            .find(|place| self.selected.contains(place.id()))
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected ids in place order.
    pub fn selected_ids(&self) -> Vec<PlaceId> {
        self.places
            .iter()
            .filter(|place| self.selected.contains(place.id()))
            .map(|place| place.id().clone())
            .collect()
    }

    pub fn move_selected(&mut self, offset: Position) {
        for place in &mut self.places {
            if self.selected.contains(place.id()) {
                place.set_position(Some(place.position().unwrap_or_default() + offset));
            }
        }
    }

    pub fn update_place(
        &mut self,
        place_id: &PlaceId,
        edit: PlaceEdit,
    ) -> Result<(), SessionError> {
        let idx = self.index(place_id)?;
        let place = &mut self.places[idx];
        if let Some(name) = edit.name {
            place.set_name(name.trim());
        }
        if let Some(description) = edit.description {
            place.set_description(non_blank(description));
        }
        if let Some(custom_args) = edit.custom_args {
            place.set_custom_args(non_blank(custom_args));
        }
        if let Some(color) = edit.foreground_color {
            place.set_foreground_color(non_blank(color));
        }
        if let Some(color) = edit.background_color {
            place.set_background_color(non_blank(color));
        }
        if let Some(pulse) = edit.pulse_animation {
            place.set_pulse_animation(pulse);
        }
        place.normalize(&self.style);
        Ok(())
    }

    /// Sets or clears the teleport of a place. A teleport back onto the same place is refused.
    pub fn set_teleport(
        &mut self,
        place_id: &PlaceId,
        teleport: Option<Teleport>,
    ) -> Result<(), SessionError> {
        if teleport
            .as_ref()
            .is_some_and(|teleport| &teleport.target_place_id == place_id)
        {
            return Err(SessionError::TeleportToSelf(place_id.clone()));
        }
        let idx = self.index(place_id)?;
        let place = &mut self.places[idx];
        place.set_teleport(teleport);
        place.normalize(&self.style);
        Ok(())
    }

    /// The 3x3 preview around a place: each direction with the neighbor found there.
    pub fn place_neighbors(&self, place_id: &PlaceId) -> Option<[(Direction, Option<&Place>); 8]> {
        let place = self.place(place_id)?;
        Some(Direction::ALL.map(|dir| {
            let neighbor = graph::get_edge(place, dir).and_then(|id| self.place(id));
            (dir, neighbor)
        }))
    }

    /// Each undirected edge once.
    pub fn connections(&self) -> Vec<(PlaceId, Direction, PlaceId)> {
        graph::edges(&self.places)
    }

    /// Applies map metadata changes. A blank name is rejected before anything changes.
    pub fn update_map_settings(&mut self, settings: MapSettings) -> Result<(), SessionError> {
        let name = settings.name.map(|name| name.trim().to_owned());
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(SessionError::Validation("map name must not be empty"));
        }

        if let Some(name) = name {
            self.map.set_name(name);
        }
        if let Some(zone) = settings.zone {
            self.map.set_zone(zone.trim());
        }
        if let Some(kind) = settings.kind {
            self.map.set_kind(kind);
        }
        if let Some(description) = settings.description {
            self.map.set_description(non_blank(description));
        }
        if let Some(custom_args) = settings.custom_args {
            self.map.set_custom_args(non_blank(custom_args));
        }
        let current = self.map.spacing();
        let x = settings.spacing_x.filter(|x| *x > 0.0).unwrap_or(current.x);
        let y = settings.spacing_y.filter(|y| *y > 0.0).unwrap_or(current.y);
        self.map.set_spacing(Spacing::new(x, y).unwrap_or(current));
        Ok(())
    }

    /// The map as it would be saved right now.
    pub fn export_snapshot(&self) -> Map {
        let mut map = self.map.clone();
        map.set_places(self.places.clone());
        map
    }

    /// Stamps the modification time, then upserts and saves the map collection.
    pub fn save<S: RawStorage>(&mut self, store: &mut Store<S>) -> Result<Map, SessionError> {
        self.map.touch();
        let snapshot = self.export_snapshot();
        store.put(&snapshot)?;
        store.save(MAPS_COLLECTION)?;
        tracing::debug!(map_id = %snapshot.id(), places = snapshot.places().len(), "saved map");
        Ok(snapshot)
    }

    /// Jumps through the teleport of the single selected place.
    ///
    /// Saves the current map, opens the target map from `store` and selects the target place.
    /// Returns `false` (and changes nothing) unless exactly one place with a teleport is
    /// selected and the target map exists.
    pub fn follow_teleport<S: RawStorage>(
        &mut self,
        store: &mut Store<S>,
    ) -> Result<bool, SessionError> {
        if self.selected_count() != 1 {
            return Ok(false);
        }
        let Some(teleport) = self.selected_one().and_then(Place::teleport).cloned() else {
            return Ok(false);
        };
        if !store.contains(MAPS_COLLECTION) {
            store.load(MAPS_COLLECTION);
        }
        if store
            .get_by_id(MAPS_COLLECTION, teleport.target_map_id.as_str())
            .is_none()
        {
            tracing::warn!(map_id = %teleport.target_map_id, "teleport target map not found");
            return Ok(false);
        }

        self.save(store)?;
        let Some(target) = store.fetch::<Map>(teleport.target_map_id.as_str())? else {
            return Ok(false);
        };
        self.load_map(target);
        if self.place(&teleport.target_place_id).is_some() {
            self.selected.insert(teleport.target_place_id);
        }
        Ok(true)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
