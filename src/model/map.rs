// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use super::ids::{MapId, PlaceId};
use super::place::{Place, Teleport};

pub const DEFAULT_ZONE: &str = "default";
pub const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapKind {
    /// Fights are optional.
    #[default]
    Free,
    /// No fights at all (starter areas, cities).
    Protected,
    /// Meeting anyone starts a fight.
    Dangerous,
}

impl MapKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Protected => "protected",
            Self::Dangerous => "dangerous",
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown map kind '{0}'")]
pub struct ParseMapKindError(pub String);

impl FromStr for MapKind {
    type Err = ParseMapKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "free" | "自由区" => Ok(Self::Free),
            "protected" | "保护区" => Ok(Self::Protected),
            "dangerous" | "危险区" => Ok(Self::Dangerous),
            other => match other.to_ascii_lowercase().as_str() {
                "free" => Ok(Self::Free),
                "protected" => Ok(Self::Protected),
                "dangerous" => Ok(Self::Dangerous),
                _ => Err(ParseMapKindError(s.to_owned())),
            },
        }
    }
}

/// Layout gaps between auto-placed places. Both values are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub x: f32,
    pub y: f32,
}

impl Spacing {
    pub fn new(x: f32, y: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        (valid(x) && valid(y)).then_some(Self { x, y })
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self { x: 180.0, y: 120.0 }
    }
}

/// Suffix tag of a map name, written after `#` (`"Misty Forest#maze"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTag {
    Maze,
    Explore,
    Other,
}

impl NameTag {
    fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "maze" | "迷宫" => Some(Self::Maze),
            "explore" | "探索" => Some(Self::Explore),
            "other" | "其他" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    id: MapId,
    zone: String,
    name: String,
    kind: MapKind,
    places: Vec<Place>,
    spacing: Spacing,
    description: Option<String>,
    custom_args: Option<String>,
    last_modified: Option<DateTime<Utc>>,
}

impl Map {
    /// A fresh empty map in the default zone.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(MapId::generate(), name)
    }

    /// A fresh map named after its own generated id.
    pub fn untitled() -> Self {
        let id = MapId::generate();
        let name = format!("map-{id}");
        Self::with_id(id, name)
    }

    pub fn with_id(id: MapId, name: impl Into<String>) -> Self {
        Self {
            id,
            zone: DEFAULT_ZONE.to_owned(),
            name: name.into(),
            kind: MapKind::default(),
            places: Vec::new(),
            spacing: Spacing::default(),
            description: None,
            custom_args: None,
            last_modified: None,
        }
    }

    pub fn id(&self) -> &MapId {
        &self.id
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn set_zone(&mut self, zone: impl Into<String>) {
        self.zone = zone.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Name without the `#tag` suffix.
    pub fn display_name(&self) -> &str {
        self.name.split('#').next().unwrap_or_default()
    }

    pub fn name_tag(&self) -> Option<NameTag> {
        self.name.split('#').nth(1).and_then(NameTag::parse)
    }

    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: MapKind) {
        self.kind = kind;
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn set_places(&mut self, places: Vec<Place>) {
        self.places = places;
    }

    pub fn take_places(&mut self) -> Vec<Place> {
        std::mem::take(&mut self.places)
    }

    pub fn place(&self, place_id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|place| place.id() == place_id)
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.spacing = spacing;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description<T: Into<String>>(&mut self, description: Option<T>) {
        self.description = description.map(Into::into);
    }

    pub fn custom_args(&self) -> Option<&str> {
        self.custom_args.as_deref()
    }

    pub fn set_custom_args<T: Into<String>>(&mut self, custom_args: Option<T>) {
        self.custom_args = custom_args.map(Into::into);
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    pub fn set_last_modified(&mut self, at: Option<DateTime<Utc>>) {
        self.last_modified = at;
    }

    pub fn touch(&mut self) {
        self.last_modified = Some(Utc::now());
    }

    /// `last_modified` rendered in local time.
    pub fn last_modified_text(&self) -> Option<String> {
        self.last_modified
            .map(|at| at.with_timezone(&Local).format(LAST_MODIFIED_FORMAT).to_string())
    }

    /// Reference to the last place carrying a teleport, usable as the target of another
    /// map's teleport.
    pub fn teleport_anchor(&self) -> Option<Teleport> {
        let place = self.places.iter().rev().find(|place| place.teleport().is_some())?;
        Some(Teleport {
            target_map_id: self.id.clone(),
            target_map_name: self.name.clone(),
            target_place_id: place.id().clone(),
            target_place_name: place.name().to_owned(),
        })
    }
}
