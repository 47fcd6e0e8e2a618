//! Player-owned game state and its default-fill loaders.
//!
//! Every category follows the same rule: materialize defaults first, then
//! apply whatever the stored payload (or a patch) supplies. `from_stored`
//! recovers corrupt rows per category instead of failing the request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Station chief profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub level: i64,
    pub xp: i64,
    pub title: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            level: 1,
            xp: 0,
            title: "Начальник станции".into(),
        }
    }
}

/// Resource stockpiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resources {
    pub energy: i64,
    pub metal: i64,
    pub water: i64,
    pub food: i64,
    pub crystals: i64,
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            energy: 5000,
            metal: 2000,
            water: 1000,
            food: 500,
            crystals: 100,
        }
    }
}

/// Clan membership, unset for fresh players.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Clan {
    pub id: Option<i64>,
    pub role: Option<String>,
}

/// Full per-player state, serialized into the player row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameState {
    pub profile: Profile,
    pub resources: Resources,
    pub buildings: HashMap<String, i64>,
    pub army: HashMap<String, i64>,
    pub research: HashMap<String, i64>,
    pub clan: Clan,
}

impl Default for GameState {
    fn default() -> Self {
        let buildings = ["command_center", "generator", "mine", "well", "farm"]
            .into_iter()
            .map(|b| (b.to_string(), 1))
            .collect();

        GameState {
            profile: Profile::default(),
            resources: Resources::default(),
            buildings,
            army: HashMap::from([("militia".to_string(), 10)]),
            research: HashMap::new(),
            clan: Clan::default(),
        }
    }
}

impl GameState {
    /// Loads a stored payload, replacing anything unreadable with defaults.
    ///
    /// Recovery is per category: a category that fails to parse falls back to
    /// its default while the others keep their stored values. Missing
    /// sub-keys inside a category are filled by the serde defaults above.
    pub fn from_stored(raw: &str) -> GameState {
        let value = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
        let mut state = GameState::default();
        let Value::Object(map) = value else {
            return state;
        };

        if let Some(v) = map.get("profile") {
            if let Ok(p) = serde_json::from_value::<Profile>(v.clone()) {
                state.profile = p;
            }
        }
        if let Some(v) = map.get("resources") {
            if let Ok(r) = serde_json::from_value::<Resources>(v.clone()) {
                state.resources = r;
            }
        }
        if let Some(v) = map.get("clan") {
            if let Ok(c) = serde_json::from_value::<Clan>(v.clone()) {
                state.clan = c;
            }
        }
        // Maps are spread over the starting set so base keys survive sparse
        // payloads.
        if let Some(v) = map.get("buildings") {
            if let Ok(b) = serde_json::from_value::<HashMap<String, i64>>(v.clone()) {
                state.buildings.extend(b);
            }
        }
        if let Some(v) = map.get("army") {
            if let Ok(a) = serde_json::from_value::<HashMap<String, i64>>(v.clone()) {
                state.army.extend(a);
            }
        }
        if let Some(v) = map.get("research") {
            if let Ok(r) = serde_json::from_value::<HashMap<String, i64>>(v.clone()) {
                state.research.extend(r);
            }
        }

        state.normalize();
        state
    }

    /// Re-inserts any starting building / unit key a payload dropped.
    pub fn normalize(&mut self) {
        let base = GameState::default();
        for (k, v) in base.buildings {
            self.buildings.entry(k).or_insert(v);
        }
        for (k, v) in base.army {
            self.army.entry(k).or_insert(v);
        }
    }
}
