// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Directional edge primitives.
//!
//! This is the only module that writes neighbor slots. Every write touches both endpoints,
//! so `a.neighbors[d] == b` always comes with `b.neighbors[d.reverse()] == a`.

use crate::model::{Direction, Place, PlaceId};

/// Scan order used by `find_direction`.
const SCAN_ORDER: [Direction; 8] = [
    Direction::North,
    Direction::West,
    Direction::South,
    Direction::East,
    Direction::NorthWest,
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::SouthEast,
];

pub fn get_edge(place: &Place, dir: Direction) -> Option<&PlaceId> {
    place.neighbors().get(dir)
}

/// Filled slots of `place`, in `Direction::ALL` order.
pub fn neighbor_ids(place: &Place) -> impl Iterator<Item = (Direction, &PlaceId)> + '_ {
    place.neighbors().iter()
}

/// Writes `src[dir] = dst` and `dst[dir.reverse()] = src` together.
///
/// Prior values in those two slots are overwritten without unlinking their other endpoints;
/// use `connect_exclusive` when the slots may be occupied.
pub fn connect(src: &mut Place, dst: &mut Place, dir: Direction) {
    src.neighbors_mut().set(dir, Some(dst.id().clone()));
    dst.neighbors_mut().set(dir.reverse(), Some(src.id().clone()));
}

/// Clears every slot on either side that references the other. Idempotent.
pub fn disconnect(a: &mut Place, b: &mut Place) {
    clear_references(a, b.id());
    clear_references(b, a.id());
}

pub fn find_direction(src: &Place, dst: &Place) -> Option<Direction> {
    SCAN_ORDER
        .into_iter()
        .find(|dir| src.neighbors().get(*dir) == Some(dst.id()))
}

pub fn are_connected(a: &Place, b: &Place) -> bool {
    find_direction(a, b).is_some() || find_direction(b, a).is_some()
}

/// Returns how many slots were cleared.
fn clear_references(place: &mut Place, target: &PlaceId) -> usize {
    let mut cleared = 0;
    for dir in Direction::ALL {
        if place.neighbors().get(dir) == Some(target) {
            place.neighbors_mut().set(dir, None);
            cleared += 1;
        }
    }
    cleared
}

pub fn index_of(places: &[Place], place_id: &PlaceId) -> Option<usize> {
    places.iter().position(|place| place.id() == place_id)
}

/// Two distinct mutable places out of one slice. `None` when `a == b` or out of bounds.
pub fn pair_mut(places: &mut [Place], a: usize, b: usize) -> Option<(&mut Place, &mut Place)> {
    if a == b || a >= places.len() || b >= places.len() {
        return None;
    }
    if a < b {
        let (head, tail) = places.split_at_mut(b);
        Some((&mut head[a], &mut tail[0]))
    } else {
        let (head, tail) = places.split_at_mut(a);
        Some((&mut tail[0], &mut head[b]))
    }
}

/// Unlinks `places[idx]` from whatever sits in its `dir` slot. A slot pointing at a place
/// missing from `places` is cleared on this side only.
fn free_slot(places: &mut [Place], idx: usize, dir: Direction) {
    let Some(other_id) = places[idx].neighbors().get(dir).cloned() else {
        return;
    };
    match index_of(places, &other_id).and_then(|other| pair_mut(places, idx, other)) {
        Some((place, other)) => disconnect(place, other),
        None => places[idx].neighbors_mut().set(dir, None),
    }
}

/// Break-then-make connect between `places[src]` and `places[dst]`.
///
/// Drops any existing edge between the pair, frees `src[dir]` and `dst[dir.reverse()]` from
/// their current neighbors, then connects. Afterwards the pair shares exactly one edge and
/// neither slot is shared with a third place. Returns `false` when `src == dst` or an index is
/// out of bounds, leaving everything untouched.
pub fn connect_exclusive(places: &mut [Place], src: usize, dst: usize, dir: Direction) -> bool {
    if pair_mut(places, src, dst).is_none() {
        return false;
    }
    if let Some((a, b)) = pair_mut(places, src, dst) {
        disconnect(a, b);
    }
    free_slot(places, src, dir);
    free_slot(places, dst, dir.reverse());
    match pair_mut(places, src, dst) {
        Some((a, b)) => {
            connect(a, b, dir);
            true
        }
        None => false,
    }
}

/// Disconnects `places[idx]` from every neighbor it references, and clears any slot elsewhere
/// still pointing at it (one-way links read from storage). Returns how many links were dropped.
pub fn detach(places: &mut [Place], idx: usize) -> usize {
    let Some(place) = places.get(idx) else {
        return 0;
    };
    let place_id = place.id().clone();
    let dirs = neighbor_ids(place).map(|(dir, _)| dir).collect::<Vec<_>>();
    for dir in &dirs {
        free_slot(places, idx, *dir);
    }
    let one_way: usize = places
        .iter_mut()
        .enumerate()
        .filter(|(other_idx, _)| *other_idx != idx)
        .map(|(_, other)| clear_references(other, &place_id))
        .sum();
    dirs.len() + one_way
}

/// Every undirected edge once, as `(from, direction, to)` seen from the earlier place.
pub fn edges(places: &[Place]) -> Vec<(PlaceId, Direction, PlaceId)> {
    let mut out = Vec::new();
    for (idx, place) in places.iter().enumerate() {
        for (dir, other) in neighbor_ids(place) {
            let earlier = index_of(places, other).is_some_and(|other_idx| other_idx < idx);
            if !earlier {
                out.push((place.id().clone(), dir, other.clone()));
            }
        }
    }
    out
}
