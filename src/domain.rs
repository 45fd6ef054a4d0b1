//! Domain models used by the backend: case files, missions, and their success conditions.

use serde::{Deserialize, Serialize};

use crate::validator::Rule;

/// Difficulty tier shown on case previews; also scales the unlock price.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}
impl Default for Difficulty {
  fn default() -> Self { Difficulty::Beginner }
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "beginner",
      Difficulty::Intermediate => "intermediate",
      Difficulty::Advanced => "advanced",
    }
  }
}

/// Where did we get the case from?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaseSource {
  LocalBank,   // from user-provided TOML bank
  Seed,  // built-in catalog
}

/// A single named success condition checked against a submission.
/// `rule` is `None` when the label is outside the known vocabulary; such a
/// condition can never be satisfied.
#[derive(Clone, Debug)]
pub struct Condition {
  pub label: String,
  pub rule: Option<Rule>,
}

impl Condition {
  pub fn new(label: impl Into<String>) -> Self {
    let label = label.into();
    let rule = Rule::for_label(&label);
    Condition { label, rule }
  }
}

/// One playable mission inside a case: briefing, starter files, and the
/// conditions a submission must satisfy.
#[derive(Clone, Debug)]
pub struct Mission {
  pub id: String,
  pub case_id: String,
  pub title: String,
  pub briefing: String,
  pub starter_html: String,
  pub starter_css: String,
  pub hint: Option<String>,
  pub conditions: Vec<Condition>,
}

/// Core case structure persisted in-memory. Cases without missions are
/// catalog-only: they can be listed and unlocked but not played yet.
#[derive(Clone, Debug)]
pub struct CaseFile {
  pub id: String,
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub duration: String,   // display label (e.g. "15-20 min")
  pub clue_points: u32,
  pub source: CaseSource,
  pub missions: Vec<Mission>,
}

impl CaseFile {
  /// Unlock price in points: twice the clue reward, scaled by difficulty.
  pub fn unlock_cost(&self) -> u32 {
    let base = self.clue_points * 2;
    match self.difficulty {
      Difficulty::Beginner => base,
      Difficulty::Intermediate => (base as f64 * 1.5).floor() as u32,
      Difficulty::Advanced => base * 2,
    }
  }
}
