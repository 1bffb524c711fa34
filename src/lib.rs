// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mapwright: authoring core for eight-directional place graphs.
//!
//! Places sit on a 2D canvas and link to up to eight neighbors (N, S, E, W, NW, NE, SW, SE);
//! every link is kept reciprocal. Maps group places and are persisted as JSON records in a
//! `store::Store`. Editing happens in a `session::EditSession`; `library::MapLibrary` is the
//! entry point for listing, creating and importing maps.

pub mod config;
pub mod events;
pub mod graph;
pub mod library;
pub mod model;
pub mod session;
pub mod store;
