// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON shape of a map record.
//!
//! Field names are camelCase. Aliases accept files written by older tools (`_id`, `desc`,
//! `colorbg`, `skip`, `spaceW`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Record, StoreError};
use crate::config::PlaceStyle;
use crate::model::map::DEFAULT_ZONE;
use crate::model::{
    Direction, Map, MapId, MapKind, Neighbors, Place, PlaceId, Position, Spacing, Teleport,
};

pub const MAPS_COLLECTION: &str = "maps";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapJson {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default = "default_zone")]
    zone: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    places: Vec<PlaceJson>,
    #[serde(default, alias = "spaceW", skip_serializing_if = "Option::is_none")]
    spacing_x: Option<f32>,
    #[serde(default, alias = "spaceH", skip_serializing_if = "Option::is_none")]
    spacing_y: Option<f32>,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, alias = "args", skip_serializing_if = "Option::is_none")]
    custom_args: Option<String>,
    #[serde(default, alias = "time", skip_serializing_if = "Option::is_none")]
    last_modified: Option<i64>,
    #[serde(default, alias = "timeStr", skip_serializing_if = "Option::is_none")]
    last_modified_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceJson {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, alias = "args", skip_serializing_if = "Option::is_none")]
    custom_args: Option<String>,
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    foreground_color: Option<String>,
    #[serde(default, alias = "colorbg", skip_serializing_if = "Option::is_none")]
    background_color: Option<String>,
    #[serde(default, alias = "pos", skip_serializing_if = "Option::is_none")]
    position: Option<PositionJson>,
    #[serde(default, alias = "fadeLoop")]
    pulse_animation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    e: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    w: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ne: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    se: Option<String>,
    #[serde(default, alias = "skip", skip_serializing_if = "Option::is_none")]
    teleport: Option<TeleportJson>,
}

impl PlaceJson {
    fn slot(&self, dir: Direction) -> Option<&str> {
        let value = match dir {
            Direction::North => &self.n,
            Direction::South => &self.s,
            Direction::West => &self.w,
            Direction::East => &self.e,
            Direction::NorthWest => &self.nw,
            Direction::NorthEast => &self.ne,
            Direction::SouthWest => &self.sw,
            Direction::SouthEast => &self.se,
        };
        value.as_deref().filter(|id| !id.is_empty())
    }

    fn slot_mut(&mut self, dir: Direction) -> &mut Option<String> {
        match dir {
            Direction::North => &mut self.n,
            Direction::South => &mut self.s,
            Direction::West => &mut self.w,
            Direction::East => &mut self.e,
            Direction::NorthWest => &mut self.nw,
            Direction::NorthEast => &mut self.ne,
            Direction::SouthWest => &mut self.sw,
            Direction::SouthEast => &mut self.se,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PositionJson {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeleportJson {
    #[serde(alias = "mapId")]
    target_map_id: String,
    #[serde(default, alias = "map")]
    target_map_name: String,
    #[serde(alias = "placeId")]
    target_place_id: String,
    #[serde(default, alias = "place")]
    target_place_name: String,
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_owned()
}

fn invalid(reason: impl Into<String>) -> StoreError {
    StoreError::InvalidRecord {
        collection: MAPS_COLLECTION.to_owned(),
        reason: reason.into(),
    }
}

fn map_to_json(map: &Map) -> MapJson {
    let spacing = map.spacing();
    MapJson {
        id: map.id().to_string(),
        zone: map.zone().to_owned(),
        name: map.name().to_owned(),
        kind: Some(map.kind().as_str().to_owned()),
        places: map.places().iter().map(place_to_json).collect(),
        spacing_x: Some(spacing.x),
        spacing_y: Some(spacing.y),
        description: map.description().map(str::to_owned),
        custom_args: map.custom_args().map(str::to_owned),
        last_modified: map.last_modified().map(|at| at.timestamp_millis()),
        last_modified_text: map.last_modified_text(),
    }
}

fn place_to_json(place: &Place) -> PlaceJson {
    let mut json = PlaceJson {
        id: place.id().to_string(),
        name: place.name().to_owned(),
        description: place.description().map(str::to_owned),
        custom_args: place.custom_args().map(str::to_owned),
        foreground_color: place.foreground_color().map(str::to_owned),
        background_color: place.background_color().map(str::to_owned),
        position: place.position().map(|pos| PositionJson { x: pos.x, y: pos.y }),
        pulse_animation: place.pulse_animation(),
        n: None,
        s: None,
        e: None,
        w: None,
        nw: None,
        ne: None,
        sw: None,
        se: None,
        teleport: place.teleport().map(|teleport| TeleportJson {
            target_map_id: teleport.target_map_id.to_string(),
            target_map_name: teleport.target_map_name.clone(),
            target_place_id: teleport.target_place_id.to_string(),
            target_place_name: teleport.target_place_name.clone(),
        }),
    };
    for (dir, neighbor) in place.neighbors().iter() {
        *json.slot_mut(dir) = Some(neighbor.to_string());
    }
    json
}

fn map_from_json(json: MapJson) -> Result<Map, StoreError> {
    let map_id = MapId::new(json.id.clone())
        .map_err(|err| invalid(format!("map id {:?}: {err}", json.id)))?;
    let mut map = Map::with_id(map_id, json.name);
    map.set_zone(json.zone);
    if let Some(kind) = json.kind.as_deref() {
        map.set_kind(kind.parse::<MapKind>().map_err(|err| invalid(err.to_string()))?);
    }
    // Each axis falls back on its own when missing or unusable.
    let defaults = Spacing::default();
    let usable = |value: Option<f32>| value.filter(|v| v.is_finite() && *v > 0.0);
    map.set_spacing(Spacing {
        x: usable(json.spacing_x).unwrap_or(defaults.x),
        y: usable(json.spacing_y).unwrap_or(defaults.y),
    });
    map.set_description(json.description);
    map.set_custom_args(json.custom_args);
    if let Some(millis) = json.last_modified {
        map.set_last_modified(DateTime::<Utc>::from_timestamp_millis(millis));
    }

    let places = json
        .places
        .into_iter()
        .map(place_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    map.set_places(places);
    Ok(map)
}

fn place_from_json(json: PlaceJson) -> Result<Place, StoreError> {
    let place_id = PlaceId::new(json.id.clone())
        .map_err(|err| invalid(format!("place id {:?}: {err}", json.id)))?;

    let mut entries = Vec::new();
    for dir in Direction::ALL {
        if let Some(raw) = json.slot(dir) {
            let neighbor = PlaceId::new(raw)
                .map_err(|err| invalid(format!("neighbor {dir} of {place_id}: {err}")))?;
            entries.push((dir, neighbor));
        }
    }

    let teleport = json
        .teleport
        .map(|teleport| -> Result<Teleport, StoreError> {
            Ok(Teleport {
                target_map_id: MapId::new(teleport.target_map_id)
                    .map_err(|err| invalid(format!("teleport map of {place_id}: {err}")))?,
                target_map_name: teleport.target_map_name,
                target_place_id: PlaceId::new(teleport.target_place_id)
                    .map_err(|err| invalid(format!("teleport place of {place_id}: {err}")))?,
                target_place_name: teleport.target_place_name,
            })
        })
        .transpose()?;

    let mut place = Place::with_id(place_id, json.name);
    place.set_description(json.description);
    place.set_custom_args(json.custom_args);
    place.set_foreground_color(json.foreground_color);
    place.set_background_color(json.background_color);
    place.set_position(json.position.map(|pos| Position::new(pos.x, pos.y)));
    place.set_pulse_animation(json.pulse_animation);
    place.set_neighbors(Neighbors::from_entries(entries));
    place.set_teleport(teleport);
    place.normalize(&PlaceStyle::default());
    Ok(place)
}

impl Record for Map {
    const COLLECTION: &'static str = MAPS_COLLECTION;

    fn record_id(&self) -> &str {
        self.id().as_str()
    }

    fn to_record(&self) -> Result<Value, StoreError> {
        serde_json::to_value(map_to_json(self)).map_err(|source| StoreError::Json {
            key: MAPS_COLLECTION.to_owned(),
            source,
        })
    }

    fn from_record(value: &Value) -> Result<Self, StoreError> {
        let json = MapJson::deserialize(value).map_err(|source| StoreError::Json {
            key: MAPS_COLLECTION.to_owned(),
            source,
        })?;
        map_from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Record;
    use crate::model::fixtures::{east_road, pid};
    use crate::model::{Direction, Map, MapKind, Spacing};

    #[test]
    fn encodes_neighbor_slots_as_flat_fields() {
        let value = east_road().to_record().expect("encode");

        let middle = &value["places"][1];
        assert_eq!(middle["id"], "b");
        assert_eq!(middle["w"], "a");
        assert_eq!(middle["e"], "c");
        assert!(middle.get("n").is_none());
        assert_eq!(value["type"], "free");
        assert_eq!(value["spacingX"], 180.0);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let mut map = east_road();
        map.set_description(Some("a dusty road"));
        map.set_kind(MapKind::Dangerous);
        map.touch();

        let decoded = Map::from_record(&map.to_record().expect("encode")).expect("decode");

        assert_eq!(decoded.places(), map.places());
        assert_eq!(decoded.kind(), MapKind::Dangerous);
        assert_eq!(decoded.description(), Some("a dusty road"));
        assert_eq!(
            decoded.last_modified().map(|at| at.timestamp_millis()),
            map.last_modified().map(|at| at.timestamp_millis())
        );
    }

    #[test]
    fn decodes_legacy_field_names() {
        let value = json!({
            "_id": "m1",
            "zone": "north",
            "name": "迷雾森林#迷宫",
            "type": "保护区",
            "desc": "fog",
            "spaceW": 200,
            "spaceH": -1,
            "time": 1700000000000_i64,
            "timeStr": "ignored",
            "places": [
                { "_id": "p1", "name": "Gate", "colorbg": "#1C6B32", "fadeLoop": false,
                  "pos": { "x": 10, "y": 20 }, "e": "p2", "n": "",
                  "skip": { "mapId": "m2", "map": "Town", "placeId": "t1", "place": "Square" } },
                { "_id": "p2", "name": "Path", "color": "#FFFFFF", "w": "p1" }
            ]
        });

        let map = Map::from_record(&value).expect("decode");

        assert_eq!(map.id().as_str(), "m1");
        assert_eq!(map.kind(), MapKind::Protected);
        assert_eq!(map.display_name(), "迷雾森林");
        assert_eq!(map.description(), Some("fog"));
        assert_eq!(map.spacing(), Spacing { x: 200.0, y: 120.0 });
        assert!(map.last_modified().is_some());

        let gate = map.place(&pid("p1")).expect("gate");
        assert_eq!(gate.neighbors().get(Direction::East), Some(&pid("p2")));
        assert_eq!(gate.neighbors().get(Direction::North), None);
        let teleport = gate.teleport().expect("teleport");
        assert_eq!(teleport.target_place_id, pid("t1"));
        assert_eq!(teleport.target_map_name, "Town");
        assert_eq!(gate.position().map(|p| (p.x, p.y)), Some((10.0, 20.0)));
    }

    #[test]
    fn decoded_teleport_places_use_teleport_presentation() {
        let value = json!({
            "id": "m1",
            "name": "Docks",
            "places": [
                { "id": "p1", "name": "Ferry", "colorbg": "#000000", "fadeLoop": true,
                  "skip": { "mapId": "m2", "map": "Isle", "placeId": "t1", "place": "Pier" } },
                { "id": "p2", "name": "Quay", "backgroundColor": "#000000",
                  "pulseAnimation": true }
            ]
        });

        let map = Map::from_record(&value).expect("decode");

        let ferry = map.place(&pid("p1")).expect("ferry");
        assert_eq!(ferry.background_color(), Some("#1C6B32"));
        assert!(!ferry.pulse_animation());
        let quay = map.place(&pid("p2")).expect("quay");
        assert_eq!(quay.background_color(), Some("#000000"));
        assert!(quay.pulse_animation());
    }

    #[test]
    fn spacing_falls_back_per_axis() {
        let decode = |x: f32, y: f32| {
            Map::from_record(&json!({ "id": "m", "spacingX": x, "spacingY": y }))
                .expect("decode")
                .spacing()
        };

        assert_eq!(decode(-1.0, 90.0), Spacing { x: 180.0, y: 90.0 });
        assert_eq!(decode(0.0, 0.0), Spacing::default());
    }

    #[test]
    fn rejects_unknown_map_kind_and_blank_ids() {
        assert!(Map::from_record(&json!({ "id": "m", "type": "volcano" })).is_err());
        assert!(Map::from_record(&json!({ "id": "" })).is_err());
        assert!(Map::from_record(&json!({ "name": "no id" })).is_err());
    }
}
