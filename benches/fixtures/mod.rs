// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures. Place ids are random, shapes are not.

use mapwright::config::EditorConfig;
use mapwright::model::{Direction, Map, PlaceId};
use mapwright::session::EditSession;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 8x8 grid.
    GridSmall,
    /// 32x32 grid.
    GridMedium,
}

impl Case {
    pub fn side(self) -> usize {
        match self {
            Self::GridSmall => 8,
            Self::GridMedium => 32,
        }
    }
}

/// A `side`x`side` grid: rows are walked east with `create_adjacent`, each row starts south of
/// the previous one, and every place is also linked north to the place above it.
pub fn grid_session(case: Case, config: &EditorConfig) -> (EditSession, Vec<Vec<PlaceId>>) {
    let side = case.side();
    let mut map = Map::new(format!("grid {side}x{side}"));
    map.set_zone("bench");
    let mut session = EditSession::open(map, config);

    let origin = session.add_place(None, false).expect("origin");
    let mut rows: Vec<Vec<PlaceId>> = Vec::with_capacity(side);
    for r in 0..side {
        let start = if r == 0 {
            origin.clone()
        } else {
            session
                .create_adjacent(&rows[r - 1][0], Direction::South)
                .expect("row start")
                .id()
                .clone()
        };
        let mut row = vec![start];
        for c in 1..side {
            let next = session
                .create_adjacent(&row[c - 1], Direction::East)
                .expect("walk east")
                .id()
                .clone();
            if r > 0 {
                session
                    .connect_directional(&next, &rows[r - 1][c], Direction::North)
                    .expect("link north");
            }
            row.push(next);
        }
        rows.push(row);
    }
    session.clear_selection();
    (session, rows)
}

pub fn grid_map(case: Case) -> Map {
    let (session, _) = grid_session(case, &EditorConfig::default());
    session.export_snapshot()
}

pub fn checksum_map(map: &Map) -> u64 {
    let mut acc = 0u64;
    for place in map.places() {
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(place.name().len() as u64);
        acc = acc
            .wrapping_mul(131)
            .wrapping_add(place.neighbors().len() as u64);
    }
    acc
}
