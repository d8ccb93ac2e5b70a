//! Persisted player profile
//!
//! Counters that span installs rather than runs: best score, games played,
//! gem balance, and the cosmetic skins owned/selected through the shop.
//! The simulation core never touches this; the host applies gem events and
//! records run outcomes here.

use serde::{Deserialize, Serialize};

/// A purchasable player skin
#[derive(Debug, Clone, Copy)]
pub struct SkinDef {
    pub id: &'static str,
    pub name: &'static str,
    /// Gem cost (0 = free)
    pub cost: u32,
    /// CSS color used by the canvas host
    pub color: &'static str,
}

/// The always-owned fallback skin
pub const DEFAULT_SKIN: &str = "default";

/// Shop catalog
pub const SKIN_CATALOG: &[SkinDef] = &[
    SkinDef {
        id: "default",
        name: "Default Blue",
        cost: 0,
        color: "#7cc8ff",
    },
    SkinDef {
        id: "red",
        name: "Red Ball",
        cost: 100,
        color: "#ff4c4c",
    },
    SkinDef {
        id: "green",
        name: "Green Ball",
        cost: 100,
        color: "#4cff62",
    },
    SkinDef {
        id: "gold",
        name: "Gold Ball",
        cost: 200,
        color: "#ffd94c",
    },
];

/// Look up a catalog entry by ID
pub fn skin(id: &str) -> Option<&'static SkinDef> {
    SKIN_CATALOG.iter().find(|s| s.id == id)
}

/// Persisted player profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub best_score: u64,
    pub games_played: u32,
    /// Gem balance earned from pickups, spent in the shop
    pub gems: u32,
    pub owned_skins: Vec<String>,
    pub selected_skin: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            best_score: 0,
            games_played: 0,
            gems: 0,
            owned_skins: vec![DEFAULT_SKIN.to_string()],
            selected_skin: DEFAULT_SKIN.to_string(),
        }
    }
}

impl Profile {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "thumb_dodge_profile";

    pub fn new() -> Self {
        Self::default()
    }

    /// Repair a profile after deserialization: the default skin is always
    /// owned, the selection must be an owned catalog skin
    fn normalize(mut self) -> Self {
        self.owned_skins.retain(|id| skin(id).is_some());
        if !self.owned_skins.iter().any(|id| id == DEFAULT_SKIN) {
            self.owned_skins.insert(0, DEFAULT_SKIN.to_string());
        }
        if !self.owns(&self.selected_skin) {
            self.selected_skin = DEFAULT_SKIN.to_string();
        }
        self
    }

    /// Record a finished run. Returns true if `score` set a new best.
    pub fn record_run(&mut self, score: u64) -> bool {
        self.games_played += 1;
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Credit gems collected during a run
    pub fn add_gems(&mut self, amount: u32) {
        self.gems += amount;
    }

    pub fn owns(&self, id: &str) -> bool {
        self.owned_skins.iter().any(|owned| owned == id)
    }

    /// Canvas color of the currently selected skin
    pub fn selected_color(&self) -> &'static str {
        skin(&self.selected_skin)
            .unwrap_or(&SKIN_CATALOG[0])
            .color
    }

    /// Buy a skin: requires a catalog entry, no prior ownership and enough
    /// gems. Deducts the cost and selects the skin. Returns whether the
    /// purchase happened.
    pub fn buy_skin(&mut self, id: &str) -> bool {
        let Some(def) = skin(id) else {
            return false;
        };
        if self.owns(id) || self.gems < def.cost {
            return false;
        }
        self.gems -= def.cost;
        self.owned_skins.push(id.to_string());
        self.selected_skin = id.to_string();
        true
    }

    /// Select an owned skin. Returns whether the selection changed.
    pub fn select_skin(&mut self, id: &str) -> bool {
        if !self.owns(id) || self.selected_skin == id {
            return false;
        }
        self.selected_skin = id.to_string();
        true
    }

    /// Parse persisted JSON, degrading to a safe default on corruption
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Profile>(json) {
            Ok(profile) => profile.normalize(),
            Err(err) => {
                log::warn!("Corrupt profile, starting fresh: {err}");
                Self::default()
            }
        }
    }

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let profile = Self::from_json(&json);
                log::info!(
                    "Loaded profile: best {}, {} games, {} gems",
                    profile.best_score,
                    profile.games_played,
                    profile.gems
                );
                return profile;
            }
        }

        log::info!("No profile found, starting fresh");
        Self::new()
    }

    /// Save the profile to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Profile saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
