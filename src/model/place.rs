// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::{Add, AddAssign};

use super::direction::Direction;
use super::ids::{MapId, PlaceId};
use crate::config::PlaceStyle;

/// Authoring-canvas coordinate. `y` grows northwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// The eight directional edge slots of a place.
///
/// Slots are only written by the `graph` primitives so that every edge stays reciprocal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Neighbors {
    slots: [Option<PlaceId>; 8],
}

impl Neighbors {
    pub fn get(&self, dir: Direction) -> Option<&PlaceId> {
        self.slots[dir.index()].as_ref()
    }

    pub(crate) fn set(&mut self, dir: Direction, place_id: Option<PlaceId>) {
        self.slots[dir.index()] = place_id;
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (Direction, PlaceId)>) -> Self {
        let mut neighbors = Self::default();
        for (dir, place_id) in entries {
            neighbors.set(dir, Some(place_id));
        }
        neighbors
    }

    /// Filled slots in `Direction::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &PlaceId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.get(dir).map(|place_id| (dir, place_id)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// A named, non-reciprocal edge to a place in another map ("skip" point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teleport {
    pub target_map_id: MapId,
    pub target_map_name: String,
    pub target_place_id: PlaceId,
    pub target_place_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: PlaceId,
    name: String,
    description: Option<String>,
    custom_args: Option<String>,
    foreground_color: Option<String>,
    background_color: Option<String>,
    position: Option<Position>,
    pulse_animation: bool,
    neighbors: Neighbors,
    teleport: Option<Teleport>,
}

impl Place {
    /// A fresh place with a generated id and the style's default colors.
    pub fn new(name: impl Into<String>, style: &PlaceStyle) -> Self {
        let mut place = Self::with_id(PlaceId::generate(), name);
        place.foreground_color = Some(style.foreground_color.clone());
        place.background_color = Some(style.background_color.clone());
        place.normalize(style);
        place
    }

    /// A bare place with no colors, position or edges.
    pub fn with_id(id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            custom_args: None,
            foreground_color: None,
            background_color: None,
            position: None,
            pulse_animation: false,
            neighbors: Neighbors::default(),
            teleport: None,
        }
    }

    /// Copy of the display attributes (name, description, colors) under a new id.
    pub fn clone_display(&self) -> Self {
        let mut place = Self::with_id(PlaceId::generate(), self.name.clone());
        place.description = self.description.clone();
        place.foreground_color = self.foreground_color.clone();
        place.background_color = self.background_color.clone();
        place
    }

    /// Re-applies the presentation rules: a blank name becomes the placeholder, and a place
    /// with a teleport always uses the teleport color without pulsing.
    pub fn normalize(&mut self, style: &PlaceStyle) {
        if self.name.trim().is_empty() {
            self.name = style.placeholder_name.clone();
        }
        if self.teleport.is_some() {
            self.background_color = Some(style.teleport_color.clone());
            self.pulse_animation = false;
        }
    }

    pub fn id(&self) -> &PlaceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
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

    pub fn foreground_color(&self) -> Option<&str> {
        self.foreground_color.as_deref()
    }

    pub fn set_foreground_color<T: Into<String>>(&mut self, color: Option<T>) {
        self.foreground_color = color.map(Into::into);
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn set_background_color<T: Into<String>>(&mut self, color: Option<T>) {
        self.background_color = color.map(Into::into);
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    pub fn pulse_animation(&self) -> bool {
        self.pulse_animation
    }

    pub fn set_pulse_animation(&mut self, pulse: bool) {
        self.pulse_animation = pulse;
    }

    pub fn neighbors(&self) -> &Neighbors {
        &self.neighbors
    }

    pub(crate) fn neighbors_mut(&mut self) -> &mut Neighbors {
        &mut self.neighbors
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Neighbors) {
        self.neighbors = neighbors;
    }

    pub fn teleport(&self) -> Option<&Teleport> {
        self.teleport.as_ref()
    }

    /// Callers follow up with `normalize` so the teleport color rule holds.
    pub fn set_teleport(&mut self, teleport: Option<Teleport>) {
        self.teleport = teleport;
    }
}

#[cfg(test)]
mod tests {
    use super::{Neighbors, Place, Position, Teleport};
    use crate::config::PlaceStyle;
    use crate::model::{Direction, MapId, PlaceId};

    fn teleport() -> Teleport {
        Teleport {
            target_map_id: MapId::new("m2").expect("map id"),
            target_map_name: "Harbor".to_owned(),
            target_place_id: PlaceId::new("p9").expect("place id"),
            target_place_name: "Pier".to_owned(),
        }
    }

    #[test]
    fn new_place_gets_style_colors_and_placeholder_name() {
        let style = PlaceStyle::default();
        let place = Place::new("   ", &style);

        assert_eq!(place.name(), "new place");
        assert_eq!(place.foreground_color(), Some("#FFFFFF"));
        assert_eq!(place.background_color(), Some("#1c1d1f"));
        assert!(place.neighbors().is_empty());
        assert_eq!(place.id().as_str().len(), 10);
    }

    #[test]
    fn teleport_forces_color_and_stops_pulse() {
        let style = PlaceStyle::default();
        let mut place = Place::new("Gate", &style);
        place.set_pulse_animation(true);
        place.set_background_color(Some("#123456"));

        place.set_teleport(Some(teleport()));
        place.normalize(&style);

        assert_eq!(place.background_color(), Some("#1C6B32"));
        assert!(!place.pulse_animation());
    }

    #[test]
    fn clone_display_copies_look_but_not_identity_or_edges() {
        let style = PlaceStyle::default();
        let mut src = Place::new("Road", &style);
        src.set_description(Some("dusty"));
        src.set_position(Some(Position::new(4.0, 2.0)));
        src.set_neighbors(Neighbors::from_entries([(
            Direction::East,
            PlaceId::new("other").expect("id"),
        )]));

        let copy = src.clone_display();

        assert_ne!(copy.id(), src.id());
        assert_eq!(copy.name(), "Road");
        assert_eq!(copy.description(), Some("dusty"));
        assert_eq!(copy.background_color(), src.background_color());
        assert_eq!(copy.position(), None);
        assert!(copy.neighbors().is_empty());
    }

    #[test]
    fn neighbors_iterate_in_direction_order() {
        let a = PlaceId::new("a").expect("id");
        let b = PlaceId::new("b").expect("id");
        let neighbors = Neighbors::from_entries([
            (Direction::SouthEast, b.clone()),
            (Direction::North, a.clone()),
        ]);

        let entries = neighbors.iter().collect::<Vec<_>>();
        assert_eq!(entries, vec![(Direction::North, &a), (Direction::SouthEast, &b)]);
        assert_eq!(neighbors.len(), 2);
    }

    #[test]
    fn positions_add() {
        let mut pos = Position::new(1.0, 2.0) + Position::new(3.0, -1.0);
        assert_eq!(pos, Position::new(4.0, 1.0));
        pos += Position::new(-4.0, 0.0);
        assert_eq!(pos, Position::new(0.0, 1.0));
    }
}
