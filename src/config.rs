//! Loading backend configuration (economy tuning + optional case bank) from TOML.
//!
//! See `CasebookConfig` and `EconomySettings` for the expected schema.

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::Difficulty;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CasebookConfig {
  #[serde(default)]
  pub economy: EconomySettings,
  #[serde(default)]
  pub cases: Vec<CaseCfg>,
}

/// Case entry accepted in TOML configuration. Missions come inline; a mission
/// must name at least one success condition or the whole case is rejected at
/// load time.
#[derive(Clone, Debug, Deserialize)]
pub struct CaseCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub difficulty: Difficulty,
  #[serde(default)] pub duration: String,
  pub clue_points: u32,
  #[serde(default)] pub missions: Vec<MissionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MissionCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  pub briefing: String,
  #[serde(default)] pub starter_html: String,
  #[serde(default)] pub starter_css: String,
  #[serde(default)] pub hint: Option<String>,
  pub conditions: Vec<String>,
}

/// Economy tuning: signup grants, referral rewards and leveling. Defaults
/// match the hosted deployment; override the whole `[economy]` table in TOML
/// if you need different numbers.
#[derive(Clone, Debug, Deserialize)]
pub struct EconomySettings {
  pub signup_points: u32,
  pub signup_hints: u32,
  pub referred_bonus_points: u32,
  pub referred_bonus_hints: u32,
  pub referrer_reward_points: u32,
  pub referrer_reward_hints: u32,
  pub points_per_level: u32,
  /// The case every new profile starts with; also the only case that pays
  /// its clue points just once.
  pub tutorial_case: String,
}

impl Default for EconomySettings {
  fn default() -> Self {
    Self {
      signup_points: 500,
      signup_hints: 2,
      referred_bonus_points: 200,
      referred_bonus_hints: 1,
      referrer_reward_points: 100,
      referrer_reward_hints: 1,
      points_per_level: 1000,
      tutorial_case: "case-vanishing-blogger".into(),
    }
  }
}

/// Attempt to load `CasebookConfig` from CASEBOOK_CONFIG_PATH. On any
/// parsing/IO error, returns None.
pub fn load_casebook_config_from_env() -> Option<CasebookConfig> {
  let path = std::env::var("CASEBOOK_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<CasebookConfig>(&s) {
      Ok(cfg) => {
        info!(target: "casebook_backend", %path, "Loaded casebook config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "casebook_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "casebook_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
