// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{MapId, PlaceId};
use super::map::Map;
use super::place::{Place, Position};
use super::Direction;
use crate::graph;

pub(crate) fn pid(value: &str) -> PlaceId {
    PlaceId::new(value).expect("place id")
}

pub(crate) fn place_at(id: &str, name: &str, x: f32, y: f32) -> Place {
    let mut place = Place::with_id(pid(id), name);
    place.set_position(Some(Position::new(x, y)));
    place
}

/// Three places in a row, `a -E-> b -E-> c`, at spacing 180.
pub(crate) fn east_road() -> Map {
    let mut a = place_at("a", "West End", 0.0, 0.0);
    let mut b = place_at("b", "Market", 180.0, 0.0);
    let mut c = place_at("c", "East Gate", 360.0, 0.0);
    graph::connect(&mut a, &mut b, Direction::East);
    graph::connect(&mut b, &mut c, Direction::East);

    let mut map = Map::with_id(MapId::new("m:road").expect("map id"), "Road");
    map.set_zone("town");
    map.set_places(vec![a, b, c]);
    map
}

/// A hub with a neighbor in every direction.
pub(crate) fn compass_rose() -> Map {
    let mut hub = place_at("hub", "Hub", 0.0, 0.0);
    let mut places = Vec::new();
    for dir in Direction::ALL {
        let offset = dir.offset(180.0, 120.0);
        let mut spoke = place_at(dir.as_str(), dir.command(), offset.x, offset.y);
        graph::connect(&mut hub, &mut spoke, dir);
        places.push(spoke);
    }
    places.insert(0, hub);

    let mut map = Map::with_id(MapId::new("m:rose").expect("map id"), "Rose");
    map.set_places(places);
    map
}
