//! Typed partial-state patch and its merge onto the authoritative copy.
//!
//! Each category validates field-by-field against the fixed schema and
//! unknown keys fail deserialization, so a client sending a category this
//! server does not know about gets `invalid_payload` back instead of a
//! silent drop. Submitted numbers are still trusted as-is; bounding
//! client-asserted values is an open product decision.

use serde::Deserialize;
use serde_with::rust::double_option;
use std::collections::HashMap;

use crate::game::types::GameState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilePatch {
    pub level: Option<i64>,
    pub xp: Option<i64>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourcesPatch {
    pub energy: Option<i64>,
    pub metal: Option<i64>,
    pub water: Option<i64>,
    pub food: Option<i64>,
    pub crystals: Option<i64>,
}

/// Clan fields distinguish "absent" from "set to null": `{"id": null}`
/// clears the membership, an omitted `id` leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClanPatch {
    #[serde(default, with = "double_option")]
    pub id: Option<Option<i64>>,
    #[serde(default, with = "double_option")]
    pub role: Option<Option<String>>,
}

/// Client-submitted partial state. Categories it omits stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatePatch {
    pub profile: Option<ProfilePatch>,
    pub resources: Option<ResourcesPatch>,
    pub buildings: Option<HashMap<String, i64>>,
    pub army: Option<HashMap<String, i64>>,
    pub research: Option<HashMap<String, i64>>,
    pub clan: Option<ClanPatch>,
}

/// Applies `patch` onto `state`: supplied sub-keys win, everything else
/// keeps its prior value. Ends with the same default-fill normalization
/// used for corrupt-storage recovery.
pub fn apply(state: &mut GameState, patch: &StatePatch) {
    if let Some(p) = &patch.profile {
        if let Some(level) = p.level {
            state.profile.level = level;
        }
        if let Some(xp) = p.xp {
            state.profile.xp = xp;
        }
        if let Some(title) = &p.title {
            state.profile.title = title.clone();
        }
    }

    if let Some(r) = &patch.resources {
        if let Some(energy) = r.energy {
            state.resources.energy = energy;
        }
        if let Some(metal) = r.metal {
            state.resources.metal = metal;
        }
        if let Some(water) = r.water {
            state.resources.water = water;
        }
        if let Some(food) = r.food {
            state.resources.food = food;
        }
        if let Some(crystals) = r.crystals {
            state.resources.crystals = crystals;
        }
    }

    if let Some(b) = &patch.buildings {
        state
            .buildings
            .extend(b.iter().map(|(k, v)| (k.clone(), *v)));
    }
    if let Some(a) = &patch.army {
        state.army.extend(a.iter().map(|(k, v)| (k.clone(), *v)));
    }
    if let Some(r) = &patch.research {
        state.research.extend(r.iter().map(|(k, v)| (k.clone(), *v)));
    }

    if let Some(c) = &patch.clan {
        if let Some(id) = c.id {
            state.clan.id = id;
        }
        if let Some(role) = &c.role {
            state.clan.role = role.clone();
        }
    }

    state.normalize();
}
