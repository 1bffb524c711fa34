// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A map owns an ordered list of places; places reference up to eight neighbors by id and
//! optionally teleport into another map.

pub mod direction;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod map;
pub mod place;

pub use direction::{Direction, ParseDirectionError};
pub use ids::{Id, IdError, MapId, PlaceId};
pub use map::{Map, MapKind, NameTag, ParseMapKindError, Spacing};
pub use place::{Neighbors, Place, Position, Teleport};
