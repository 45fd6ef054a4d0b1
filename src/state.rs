//! Application state: in-memory stores and startup seeding.
//!
//! This module owns:
//!   - the case store (by id) plus the catalog order
//!   - the mission index (mission id -> owning case id)
//!   - player profiles and the referral-code index
//!   - the economy settings (from TOML or defaults)
//!
//! Cases come from the optional TOML bank first, then the built-in seeds;
//! seeds never overwrite a bank case that reuses an id.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_casebook_config_from_env, CaseCfg, EconomySettings};
use crate::domain::{CaseFile, CaseSource, Condition, Mission};
use crate::profile::PlayerProfile;
use crate::seeds::seed_cases;

#[derive(Clone)]
pub struct AppState {
    pub cases: Arc<RwLock<HashMap<String, CaseFile>>>,
    /// Case ids in catalog order (bank entries first, then seeds).
    pub catalog: Arc<RwLock<Vec<String>>>,
    /// Mission id -> owning case id.
    pub missions: Arc<RwLock<HashMap<String, String>>>,
    pub players: Arc<RwLock<HashMap<String, PlayerProfile>>>,
    /// Referral code -> player id. Codes are upper-case by construction.
    pub referral_codes: Arc<RwLock<HashMap<String, String>>>,
    pub economy: EconomySettings,
}

/// Convert a TOML bank entry. Returns None (with a log) when any mission has
/// an empty condition list, so unplayable cases never enter the store.
fn case_from_cfg(cc: &CaseCfg) -> Option<CaseFile> {
    let case_id = cc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut missions = Vec::with_capacity(cc.missions.len());
    for mc in &cc.missions {
        let mission_id = mc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        if mc.conditions.is_empty() {
            error!(target: "mission", case = %case_id, mission = %mission_id, "Skipping bank case: mission has no success conditions.");
            return None;
        }
        let conditions: Vec<Condition> =
            mc.conditions.iter().map(|label| Condition::new(label.as_str())).collect();
        for condition in &conditions {
            if condition.rule.is_none() {
                warn!(target: "mission", case = %case_id, mission = %mission_id, label = %condition.label, "Bank condition outside the known vocabulary; it can never be met.");
            }
        }
        missions.push(Mission {
            id: mission_id,
            case_id: case_id.clone(),
            title: mc.title.clone(),
            briefing: mc.briefing.clone(),
            starter_html: mc.starter_html.clone(),
            starter_css: mc.starter_css.clone(),
            hint: mc.hint.clone(),
            conditions,
        });
    }
    Some(CaseFile {
        id: case_id,
        title: cc.title.clone(),
        description: cc.description.clone(),
        difficulty: cc.difficulty,
        duration: cc.duration.clone(),
        clue_points: cc.clue_points,
        source: CaseSource::LocalBank,
        missions,
    })
}

impl AppState {
    /// Build state from env: load config, insert bank cases, then seeds.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg_opt = load_casebook_config_from_env();
        let economy = cfg_opt
            .as_ref()
            .map(|c| c.economy.clone())
            .unwrap_or_default();

        let mut case_map = HashMap::<String, CaseFile>::new();
        let mut catalog = Vec::<String>::new();

        // Insert config-based cases (if any) first; they own their ids.
        if let Some(cfg) = &cfg_opt {
            for cc in &cfg.cases {
                let Some(case) = case_from_cfg(cc) else { continue };
                if case_map.contains_key(&case.id) {
                    error!(target: "mission", id = %case.id, "Skipping bank case: duplicate id.");
                    continue;
                }
                catalog.push(case.id.clone());
                case_map.insert(case.id.clone(), case);
            }
        }

        // Always insert built-in seeds, but don't overwrite bank ids.
        for case in seed_cases() {
            if case_map.contains_key(&case.id) {
                continue;
            }
            catalog.push(case.id.clone());
            case_map.insert(case.id.clone(), case);
        }

        // Mission index over the final case set.
        let mut mission_map = HashMap::<String, String>::new();
        for case in case_map.values() {
            for mission in &case.missions {
                mission_map.insert(mission.id.clone(), case.id.clone());
            }
        }

        // Inventory summary by difficulty/source.
        let mut count_by_diff: HashMap<&'static str, (usize, usize, usize)> = HashMap::new();
        for case in case_map.values() {
            let entry = count_by_diff
                .entry(case.difficulty.as_str())
                .or_insert((0, 0, 0));
            match case.source {
                CaseSource::LocalBank => entry.0 += 1,
                CaseSource::Seed => entry.1 += 1,
            }
            entry.2 += case.missions.len();
        }
        for (difficulty, (bank, seed, missions)) in count_by_diff {
            info!(target: "mission", %difficulty, local_bank = bank, seed = seed, missions = missions, "Startup case inventory");
        }

        Self {
            cases: Arc::new(RwLock::new(case_map)),
            catalog: Arc::new(RwLock::new(catalog)),
            missions: Arc::new(RwLock::new(mission_map)),
            players: Arc::new(RwLock::new(HashMap::new())),
            referral_codes: Arc::new(RwLock::new(HashMap::new())),
            economy,
        }
    }

    /// Insert a case into the store and catalog, indexing its missions.
    #[instrument(level = "debug", skip(self, case), fields(id = %case.id))]
    pub async fn insert_case(&self, case: CaseFile) {
        let mut cases = self.cases.write().await;
        let mut catalog = self.catalog.write().await;
        let mut missions = self.missions.write().await;
        for mission in &case.missions {
            missions.insert(mission.id.clone(), case.id.clone());
        }
        if !catalog.contains(&case.id) {
            catalog.push(case.id.clone());
        }
        cases.insert(case.id.clone(), case);
    }

    /// Read-only access to a case by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_case(&self, id: &str) -> Option<CaseFile> {
        let cases = self.cases.read().await;
        cases.get(id).cloned()
    }

    /// Catalog-ordered snapshot of every case.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_cases(&self) -> Vec<CaseFile> {
        let catalog = { self.catalog.read().await.clone() };
        let cases = self.cases.read().await;
        catalog.iter().filter_map(|id| cases.get(id).cloned()).collect()
    }

    /// Find a mission together with its owning case.
    #[instrument(level = "debug", skip(self), fields(%mission_id))]
    pub async fn get_mission(&self, mission_id: &str) -> Option<(CaseFile, Mission)> {
        let case_id = { self.missions.read().await.get(mission_id).cloned() }?;
        let case = self.get_case(&case_id).await?;
        let mission = case.missions.iter().find(|m| m.id == mission_id).cloned()?;
        Some((case, mission))
    }

    /// Insert a player and index their referral code.
    #[instrument(level = "debug", skip(self, profile), fields(id = %profile.id))]
    pub async fn insert_player(&self, profile: PlayerProfile) {
        let mut players = self.players.write().await;
        let mut codes = self.referral_codes.write().await;
        codes.insert(profile.referral_code.clone(), profile.id.clone());
        players.insert(profile.id.clone(), profile);
    }

    /// Read-only access to a player by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_player(&self, id: &str) -> Option<PlayerProfile> {
        let players = self.players.read().await;
        players.get(id).cloned()
    }

    /// Resolve a referral code to its owner.
    #[instrument(level = "debug", skip(self), fields(%code))]
    pub async fn player_id_for_code(&self, code: &str) -> Option<String> {
        let codes = self.referral_codes.read().await;
        codes.get(code).cloned()
    }

    /// Wipe every player's achievement list. Returns how many profiles were
    /// touched (all of them, emptied or not).
    #[instrument(level = "info", skip(self))]
    pub async fn reset_all_achievements(&self) -> usize {
        let mut players = self.players.write().await;
        for player in players.values_mut() {
            player.achievements.clear();
        }
        players.len()
    }
}
