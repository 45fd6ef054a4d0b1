//! Player profiles and the point economy.
//!
//! A profile owns everything the backend tracks per player: points, hints,
//! level, unlocked and completed cases, collected evidence, achievements and
//! referral bookkeeping. All mutation rules live here; handlers only decide
//! which profile to load and which method to call.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EconomySettings;
use crate::domain::CaseFile;

pub const REFERRAL_CODE_LEN: usize = 6;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Referral codes are derived from the player id: alphanumerics only,
/// upper-cased, cut to six characters and padded with random ones when the
/// id is too short.
pub fn generate_referral_code(player_id: &str) -> String {
  let mut code: String = player_id
    .chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .map(|c| c.to_ascii_uppercase())
    .take(REFERRAL_CODE_LEN)
    .collect();
  let mut rng = rand::thread_rng();
  while code.len() < REFERRAL_CODE_LEN {
    code.push(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char);
  }
  code
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
  Code,
  Document,
  Image,
  Clue,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
  Low,
  Medium,
  High,
  Critical,
}

/// An item in a player's evidence locker.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
  pub id: String,
  pub case_id: String,
  pub title: String,
  pub description: String,
  #[serde(rename = "type")]
  pub kind: EvidenceKind,
  pub content: String,
  pub importance: Importance,
  pub discovered_at: DateTime<Utc>,
}

/// Evidence a case hands out on first completion.
#[derive(Clone, Copy, Debug)]
pub struct EvidenceTemplate {
  pub title: &'static str,
  pub description: &'static str,
  pub kind: EvidenceKind,
  pub content: &'static str,
  pub importance: Importance,
}

impl Evidence {
  pub fn from_template(case_id: &str, template: &EvidenceTemplate) -> Self {
    Evidence {
      id: Uuid::new_v4().to_string(),
      case_id: case_id.to_string(),
      title: template.title.to_string(),
      description: template.description.to_string(),
      kind: template.kind,
      content: template.content.to_string(),
      importance: template.importance,
      discovered_at: Utc::now(),
    }
  }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  pub cases_completed: u32,
  /// Seconds across every completion, replays included.
  pub total_time_spent: u32,
  pub average_case_time: f64,
  pub hints_used: u32,
  pub current_streak: u32,
  pub best_streak: u32,
}

/// One successful referral, from the referrer's point of view.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralEntry {
  pub id: String,
  pub referred_player: String,
  pub referred_player_name: String,
  pub referred_at: DateTime<Utc>,
  pub points_earned: u32,
  pub hints_earned: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStats {
  pub total_referrals: u32,
  pub successful_referrals: u32,
  pub total_rewards: u32,
  pub referral_history: Vec<ReferralEntry>,
}

/// Result of a referral check or application, in user-facing words.
#[derive(Clone, Debug, Serialize)]
pub struct ReferralOutcome {
  pub success: bool,
  pub message: String,
}

/// What a case completion changed on the profile.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseCompletion {
  pub points_awarded: u32,
  pub is_repeat: bool,
  pub total_points: u32,
  pub level: u32,
  pub new_evidence: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockOutcome {
  Unlocked,
  AlreadyUnlocked,
  InsufficientPoints,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
  pub id: String,
  pub display_name: String,
  pub level: u32,
  pub hints: u32,
  pub total_points: u32,
  pub completed_cases: Vec<String>,
  pub unlocked_cases: Vec<String>,
  pub achievements: Vec<String>,
  pub evidence: Vec<Evidence>,
  pub statistics: Statistics,
  pub created_at: DateTime<Utc>,
  pub last_seen: DateTime<Utc>,
  pub referral_code: String,
  pub referral_stats: ReferralStats,
  pub referred_by: Option<String>,
}

impl PlayerProfile {
  /// A fresh profile. Signing up through a referral code pays the bonus
  /// immediately; the tutorial case starts unlocked for everyone.
  pub fn new(
    id: impl Into<String>,
    display_name: impl Into<String>,
    referral_code: String,
    economy: &EconomySettings,
    referred_by: Option<String>,
  ) -> Self {
    let referred = referred_by.is_some();
    let now = Utc::now();
    PlayerProfile {
      id: id.into(),
      display_name: display_name.into(),
      level: 1,
      hints: economy.signup_hints + if referred { economy.referred_bonus_hints } else { 0 },
      total_points: economy.signup_points
        + if referred { economy.referred_bonus_points } else { 0 },
      completed_cases: vec![],
      unlocked_cases: vec![economy.tutorial_case.clone()],
      achievements: vec![],
      evidence: vec![],
      statistics: Statistics::default(),
      created_at: now,
      last_seen: now,
      referral_code,
      referral_stats: ReferralStats::default(),
      referred_by,
    }
  }

  pub fn touch(&mut self) {
    self.last_seen = Utc::now();
  }

  pub fn can_afford(&self, cost: u32) -> bool {
    self.total_points >= cost
  }

  /// Spend points to unlock a case. Funds are checked before the duplicate
  /// guard, so a broke player is told about the price even for cases they
  /// already own.
  pub fn unlock_case(&mut self, case: &CaseFile) -> UnlockOutcome {
    let cost = case.unlock_cost();
    if !self.can_afford(cost) {
      return UnlockOutcome::InsufficientPoints;
    }
    if self.unlocked_cases.iter().any(|c| c == &case.id) {
      return UnlockOutcome::AlreadyUnlocked;
    }
    self.total_points -= cost;
    self.unlocked_cases.push(case.id.clone());
    UnlockOutcome::Unlocked
  }

  /// Record a case completion and pay out its clue points.
  ///
  /// The tutorial case pays only once; every other case pays on replays too,
  /// and replays of those also count toward the streak. Evidence is handed
  /// out on the first completion only. The level is recomputed from total
  /// points on every completion.
  pub fn complete_case(
    &mut self,
    case: &CaseFile,
    time_spent_secs: u32,
    templates: &[EvidenceTemplate],
    economy: &EconomySettings,
  ) -> CaseCompletion {
    let already_completed = self.completed_cases.iter().any(|c| c == &case.id);
    let is_tutorial = case.id == economy.tutorial_case;
    let counts = !is_tutorial || !already_completed;

    let points_awarded = if counts { case.clue_points } else { 0 };
    self.total_points += points_awarded;
    self.level = self.total_points / economy.points_per_level + 1;

    if !already_completed {
      self.completed_cases.push(case.id.clone());
    }

    let stats = &mut self.statistics;
    let prev_total = stats.total_time_spent;
    let prev_count = stats.cases_completed;
    stats.total_time_spent += time_spent_secs;
    if counts {
      stats.cases_completed += 1;
      stats.average_case_time = (prev_total + time_spent_secs) as f64 / (prev_count + 1) as f64;
      stats.current_streak += 1;
      stats.best_streak = stats.best_streak.max(stats.current_streak);
    } else if prev_count > 0 {
      stats.average_case_time = (prev_total + time_spent_secs) as f64 / prev_count as f64;
    } else {
      stats.average_case_time = time_spent_secs as f64;
    }

    let mut new_evidence = 0;
    if !already_completed {
      for template in templates {
        self.add_evidence(Evidence::from_template(&case.id, template));
        new_evidence += 1;
      }
    }

    CaseCompletion {
      points_awarded,
      is_repeat: already_completed,
      total_points: self.total_points,
      level: self.level,
      new_evidence,
    }
  }

  /// Consume one hint. Returns false when none are left.
  pub fn use_hint(&mut self) -> bool {
    if self.hints == 0 {
      return false;
    }
    self.hints -= 1;
    self.statistics.hints_used += 1;
    true
  }

  /// Returns false when the achievement was already unlocked.
  pub fn unlock_achievement(&mut self, achievement_id: &str) -> bool {
    if self.achievements.iter().any(|a| a == achievement_id) {
      return false;
    }
    self.achievements.push(achievement_id.to_string());
    true
  }

  pub fn add_evidence(&mut self, evidence: Evidence) {
    self.evidence.push(evidence);
  }

  /// Referred player's side of a referral: bonus points and hints, and the
  /// code is remembered so it cannot be used twice. Does not touch the level.
  pub fn accept_referral(&mut self, code: String, economy: &EconomySettings) {
    self.total_points += economy.referred_bonus_points;
    self.hints += economy.referred_bonus_hints;
    self.referred_by = Some(code);
  }

  /// Referrer's side of a referral: reward payout plus history and counters.
  /// Does not touch the level.
  pub fn credit_referral(&mut self, entry: ReferralEntry, economy: &EconomySettings) {
    self.total_points += economy.referrer_reward_points;
    self.hints += economy.referrer_reward_hints;
    let stats = &mut self.referral_stats;
    stats.total_referrals += 1;
    stats.successful_referrals += 1;
    stats.total_rewards += economy.referrer_reward_points;
    stats.referral_history.push(entry);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{CaseSource, Difficulty};

  fn economy() -> EconomySettings {
    EconomySettings::default()
  }

  fn case(id: &str, clue_points: u32) -> CaseFile {
    CaseFile {
      id: id.to_string(),
      title: "Test case".into(),
      description: String::new(),
      difficulty: Difficulty::Beginner,
      duration: "10 min".into(),
      clue_points,
      source: CaseSource::Seed,
      missions: vec![],
    }
  }

  fn player(referred_by: Option<String>) -> PlayerProfile {
    PlayerProfile::new("p-1", "Ada", "ABC123".into(), &economy(), referred_by)
  }

  const TEMPLATES: [EvidenceTemplate; 2] = [
    EvidenceTemplate {
      title: "Scrap of code",
      description: "A torn printout",
      kind: EvidenceKind::Code,
      content: "display: none",
      importance: Importance::High,
    },
    EvidenceTemplate {
      title: "Note",
      description: "A hand-written note",
      kind: EvidenceKind::Clue,
      content: "warehouse 17",
      importance: Importance::Critical,
    },
  ];

  #[test]
  fn referral_codes_are_six_uppercase_alphanumerics() {
    assert_eq!(generate_referral_code("abc-123-xyz"), "ABC123");
    let padded = generate_referral_code("ab");
    assert_eq!(padded.len(), REFERRAL_CODE_LEN);
    assert!(padded.starts_with("AB"));
    assert!(padded.bytes().all(|b| CODE_ALPHABET.contains(&b)));
  }

  #[test]
  fn signup_grants_the_base_kit() {
    let p = player(None);
    assert_eq!(p.total_points, 500);
    assert_eq!(p.hints, 2);
    assert_eq!(p.level, 1);
    assert_eq!(p.unlocked_cases, vec![economy().tutorial_case]);
    assert!(p.completed_cases.is_empty());
    assert!(p.referred_by.is_none());
  }

  #[test]
  fn referred_signup_gets_the_bonus_up_front() {
    let p = player(Some("FRIEND".into()));
    assert_eq!(p.total_points, 700);
    assert_eq!(p.hints, 3);
    assert_eq!(p.level, 1);
    assert_eq!(p.referred_by.as_deref(), Some("FRIEND"));
  }

  #[test]
  fn completion_pays_points_and_recomputes_level() {
    let mut p = player(None);
    let c = case("case-heist", 600);
    let done = p.complete_case(&c, 300, &TEMPLATES, &economy());
    assert_eq!(done.points_awarded, 600);
    assert!(!done.is_repeat);
    assert_eq!(done.total_points, 1100);
    assert_eq!(done.level, 2);
    assert_eq!(done.new_evidence, 2);
    assert_eq!(p.evidence.len(), 2);
    assert_eq!(p.completed_cases, vec!["case-heist".to_string()]);
    assert_eq!(p.statistics.cases_completed, 1);
    assert_eq!(p.statistics.current_streak, 1);
    assert_eq!(p.statistics.best_streak, 1);
  }

  #[test]
  fn replaying_a_regular_case_pays_again_without_duplicate_evidence() {
    let mut p = player(None);
    let c = case("case-heist", 600);
    p.complete_case(&c, 300, &TEMPLATES, &economy());
    let again = p.complete_case(&c, 100, &TEMPLATES, &economy());
    assert!(again.is_repeat);
    assert_eq!(again.points_awarded, 600);
    assert_eq!(again.total_points, 1700);
    assert_eq!(again.new_evidence, 0);
    assert_eq!(p.evidence.len(), 2);
    assert_eq!(p.completed_cases.len(), 1);
    assert_eq!(p.statistics.cases_completed, 2);
    assert_eq!(p.statistics.current_streak, 2);
    assert_eq!(p.statistics.total_time_spent, 400);
    assert!((p.statistics.average_case_time - 200.0).abs() < f64::EPSILON);
  }

  #[test]
  fn tutorial_replay_pays_nothing_and_freezes_the_streak() {
    let eco = economy();
    let mut p = player(None);
    let tutorial = case(&eco.tutorial_case, 100);
    p.complete_case(&tutorial, 120, &TEMPLATES, &eco);
    let again = p.complete_case(&tutorial, 80, &[], &eco);
    assert!(again.is_repeat);
    assert_eq!(again.points_awarded, 0);
    assert_eq!(again.total_points, 600);
    assert_eq!(p.statistics.cases_completed, 1);
    assert_eq!(p.statistics.current_streak, 1);
    assert_eq!(p.statistics.total_time_spent, 200);
    // Replay time still counts: (120 + 80) / 1 completed case.
    assert!((p.statistics.average_case_time - 200.0).abs() < f64::EPSILON);
  }

  #[test]
  fn unlock_checks_funds_before_duplicates() {
    let eco = economy();
    let mut p = player(None);
    p.total_points = 0;
    let owned = case(&eco.tutorial_case, 100);
    assert_eq!(p.unlock_case(&owned), UnlockOutcome::InsufficientPoints);

    p.total_points = 1000;
    assert_eq!(p.unlock_case(&owned), UnlockOutcome::AlreadyUnlocked);
    assert_eq!(p.total_points, 1000);

    let fresh = case("case-heist", 100);
    assert_eq!(p.unlock_case(&fresh), UnlockOutcome::Unlocked);
    assert_eq!(p.total_points, 800);
    assert!(p.unlocked_cases.contains(&"case-heist".to_string()));
  }

  #[test]
  fn hints_run_out() {
    let mut p = player(None);
    assert!(p.use_hint());
    assert!(p.use_hint());
    assert!(!p.use_hint());
    assert_eq!(p.hints, 0);
    assert_eq!(p.statistics.hints_used, 2);
  }

  #[test]
  fn achievements_do_not_duplicate() {
    let mut p = player(None);
    assert!(p.unlock_achievement("first-case"));
    assert!(!p.unlock_achievement("first-case"));
    assert_eq!(p.achievements, vec!["first-case".to_string()]);
  }

  #[test]
  fn referral_rewards_skip_the_level() {
    let eco = economy();
    let mut referrer = player(None);
    referrer.total_points = 950;
    let entry = ReferralEntry {
      id: "ref-1".into(),
      referred_player: "p-2".into(),
      referred_player_name: "Bee".into(),
      referred_at: Utc::now(),
      points_earned: eco.referrer_reward_points,
      hints_earned: eco.referrer_reward_hints,
    };
    referrer.credit_referral(entry, &eco);
    assert_eq!(referrer.total_points, 1050);
    assert_eq!(referrer.level, 1);
    assert_eq!(referrer.hints, 3);
    assert_eq!(referrer.referral_stats.total_referrals, 1);
    assert_eq!(referrer.referral_stats.successful_referrals, 1);
    assert_eq!(referrer.referral_stats.total_rewards, 100);
    assert_eq!(referrer.referral_stats.referral_history.len(), 1);

    let mut joiner = player(None);
    joiner.accept_referral("ABC123".into(), &eco);
    assert_eq!(joiner.total_points, 700);
    assert_eq!(joiner.hints, 3);
    assert_eq!(joiner.referred_by.as_deref(), Some("ABC123"));
    assert_eq!(joiner.level, 1);
  }
}
