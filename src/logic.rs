//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Grading mission submissions
//!   - The hint budget
//!   - Registration, referral codes and their payouts
//!   - Case unlocking and completion
//!   - Catalog, case, mission and profile reads
//!
//! Every operation returns `Result<_, ApiError>`; the error doubles as an
//! HTTP response so handlers stay thin.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::profile::{
  generate_referral_code, Evidence, PlayerProfile, ReferralEntry, ReferralOutcome, UnlockOutcome,
  REFERRAL_CODE_LEN,
};
use crate::protocol::{
  case_out, case_summary_out, mission_out, CaseOut, CaseSummaryOut, EvidenceIn, MissionOut,
};
use crate::seeds::evidence_templates;
use crate::state::AppState;
use crate::util::trunc_for_log;
use crate::validator::{evaluate_mission, GradeError, MissionReport};

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Unknown caseId: {0}")]
  UnknownCase(String),
  #[error("Unknown missionId: {0}")]
  UnknownMission(String),
  #[error("Unknown playerId: {0}")]
  UnknownPlayer(String),
  #[error(transparent)]
  Grade(#[from] GradeError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::UnknownCase(_) | ApiError::UnknownMission(_) | ApiError::UnknownPlayer(_) => {
        StatusCode::NOT_FOUND
      }
      ApiError::Grade(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}

fn failure(message: &str) -> ReferralOutcome {
  ReferralOutcome { success: false, message: message.to_string() }
}

/// Grade a submission against its mission's conditions.
#[instrument(level = "info", skip(state, html, css), fields(%mission_id, html_len = html.len(), css_len = css.len()))]
pub async fn submit_mission(
  state: &AppState,
  mission_id: &str,
  html: &str,
  css: &str,
) -> Result<MissionReport, ApiError> {
  let (_case, mission) = state
    .get_mission(mission_id)
    .await
    .ok_or_else(|| ApiError::UnknownMission(mission_id.to_string()))?;
  debug!(target: "mission", %mission_id, html = %trunc_for_log(html, 160), "Grading submission");
  let report = evaluate_mission(html, css, &mission.conditions)?;
  info!(
    target: "mission",
    %mission_id,
    score = report.score,
    completed = report.is_completed,
    passed = report.completed_conditions.len(),
    total = mission.conditions.len(),
    "Submission graded"
  );
  Ok(report)
}

/// Spend one hint for the mission's hint text. `granted = false` with no text
/// means the player's budget is empty; the budget is only charged on success.
#[instrument(level = "info", skip(state), fields(%mission_id, %player_id))]
pub async fn mission_hint(
  state: &AppState,
  mission_id: &str,
  player_id: &str,
) -> Result<(bool, Option<String>, u32), ApiError> {
  let (_case, mission) = state
    .get_mission(mission_id)
    .await
    .ok_or_else(|| ApiError::UnknownMission(mission_id.to_string()))?;
  let mut players = state.players.write().await;
  let player = players
    .get_mut(player_id)
    .ok_or_else(|| ApiError::UnknownPlayer(player_id.to_string()))?;
  if !player.use_hint() {
    info!(target: "casebook_backend", %player_id, %mission_id, "Hint denied: none left");
    return Ok((false, None, player.hints));
  }
  let text = mission.hint.clone().unwrap_or_else(|| {
    format!(
      "Re-read the briefing for '{}' and compare each condition against your markup.",
      mission.title
    )
  });
  info!(target: "casebook_backend", %player_id, %mission_id, hints_left = player.hints, "Hint granted");
  Ok((true, Some(text), player.hints))
}

/// Create a profile. A referral code, when sent along, is validated first:
/// a valid one pays the signup bonus and rewards the referrer, an invalid
/// one is reported in the outcome but never blocks the registration.
#[instrument(level = "info", skip(state, referral_code), fields(%display_name, with_code = referral_code.is_some()))]
pub async fn register_player(
  state: &AppState,
  display_name: &str,
  referral_code: Option<&str>,
) -> (PlayerProfile, Option<ReferralOutcome>) {
  let mut outcome = None;
  let mut referrer_id = None;
  let mut referred_by = None;

  if let Some(code) = referral_code.filter(|c| !c.is_empty()) {
    let checked = check_referral_code(state, code).await;
    if checked.success {
      let normalized = code.trim().to_uppercase();
      referrer_id = state.player_id_for_code(&normalized).await;
      referred_by = Some(normalized);
    }
    outcome = Some(checked);
  }

  let id = Uuid::new_v4().to_string();
  let own_code = generate_referral_code(&id);
  let profile = PlayerProfile::new(id, display_name, own_code, &state.economy, referred_by);
  state.insert_player(profile.clone()).await;

  if let Some(referrer_id) = referrer_id {
    let entry = ReferralEntry {
      id: format!("ref-{}", Utc::now().timestamp_millis()),
      referred_player: profile.id.clone(),
      referred_player_name: profile.display_name.clone(),
      referred_at: Utc::now(),
      points_earned: state.economy.referrer_reward_points,
      hints_earned: state.economy.referrer_reward_hints,
    };
    let mut players = state.players.write().await;
    if let Some(referrer) = players.get_mut(&referrer_id) {
      referrer.credit_referral(entry, &state.economy);
      info!(target: "casebook_backend", referrer = %referrer_id, referred = %profile.id, "Referral rewards paid");
    }
  }

  info!(target: "casebook_backend", id = %profile.id, referred = profile.referred_by.is_some(), "Player registered");
  (profile, outcome)
}

/// Validate a referral code without applying it.
#[instrument(level = "debug", skip(state, code))]
pub async fn check_referral_code(state: &AppState, code: &str) -> ReferralOutcome {
  if code.len() != REFERRAL_CODE_LEN {
    return failure("Referral code must be 6 characters long");
  }
  let Some(referrer_id) = state.player_id_for_code(&code.to_uppercase()).await else {
    return failure("Invalid referral code - no user found with this code");
  };
  let Some(referrer) = state.get_player(&referrer_id).await else {
    return failure("Invalid referral code - no user found with this code");
  };
  ReferralOutcome {
    success: true,
    message: format!("Valid referral code from {}", referrer.display_name),
  }
}

/// Apply a referral code to an existing profile. Checked in order: code
/// already used, format, self-referral, then lookup. A profile can be
/// referred at most once.
#[instrument(level = "info", skip(state, code), fields(%player_id))]
pub async fn apply_referral_code(
  state: &AppState,
  player_id: &str,
  code: &str,
) -> Result<ReferralOutcome, ApiError> {
  let mut players = state.players.write().await;
  let Some(player) = players.get(player_id) else {
    return Err(ApiError::UnknownPlayer(player_id.to_string()));
  };
  if player.referred_by.is_some() {
    return Ok(failure("You have already used a referral code"));
  }
  if code.len() != REFERRAL_CODE_LEN {
    return Ok(failure("Referral code must be 6 characters long"));
  }
  let normalized = code.trim().to_uppercase();
  if player.referral_code == normalized {
    return Ok(failure("You cannot use your own referral code"));
  }
  let referrer_id = { state.referral_codes.read().await.get(&normalized).cloned() };
  let Some(referrer_id) = referrer_id else {
    return Ok(failure("Invalid referral code - no user found with this code"));
  };
  let Some(referrer_name) = players.get(&referrer_id).map(|r| r.display_name.clone()) else {
    return Ok(failure("Invalid referral code - no user found with this code"));
  };

  let Some(player) = players.get_mut(player_id) else {
    return Err(ApiError::UnknownPlayer(player_id.to_string()));
  };
  player.accept_referral(normalized.clone(), &state.economy);
  let entry = ReferralEntry {
    id: format!("ref-{}", Utc::now().timestamp_millis()),
    referred_player: player.id.clone(),
    referred_player_name: player.display_name.clone(),
    referred_at: Utc::now(),
    points_earned: state.economy.referrer_reward_points,
    hints_earned: state.economy.referrer_reward_hints,
  };
  if let Some(referrer) = players.get_mut(&referrer_id) {
    referrer.credit_referral(entry, &state.economy);
  }
  info!(target: "casebook_backend", %player_id, referrer = %referrer_id, "Referral applied");
  Ok(ReferralOutcome {
    success: true,
    message: format!(
      "Referral applied! You received {} points and {} hint. {} also received rewards!",
      state.economy.referred_bonus_points, state.economy.referred_bonus_hints, referrer_name
    ),
  })
}

/// Spend points to unlock a case for a player.
#[instrument(level = "info", skip(state), fields(%player_id, %case_id))]
pub async fn unlock_case(
  state: &AppState,
  player_id: &str,
  case_id: &str,
) -> Result<(bool, String, u32), ApiError> {
  let case = state
    .get_case(case_id)
    .await
    .ok_or_else(|| ApiError::UnknownCase(case_id.to_string()))?;
  let mut players = state.players.write().await;
  let player = players
    .get_mut(player_id)
    .ok_or_else(|| ApiError::UnknownPlayer(player_id.to_string()))?;
  let (success, message) = match player.unlock_case(&case) {
    UnlockOutcome::InsufficientPoints => (false, "Insufficient points".to_string()),
    UnlockOutcome::AlreadyUnlocked => (true, "Case already unlocked".to_string()),
    UnlockOutcome::Unlocked => (true, format!("Unlocked case: {}", case.id)),
  };
  info!(target: "casebook_backend", %player_id, %case_id, success, total_points = player.total_points, "Unlock attempt");
  Ok((success, message, player.total_points))
}

/// Record a case completion: clue points are looked up server-side, never
/// taken from the client.
#[instrument(level = "info", skip(state), fields(%player_id, %case_id, time_spent))]
pub async fn complete_case(
  state: &AppState,
  player_id: &str,
  case_id: &str,
  time_spent: u32,
) -> Result<crate::profile::CaseCompletion, ApiError> {
  let case = state
    .get_case(case_id)
    .await
    .ok_or_else(|| ApiError::UnknownCase(case_id.to_string()))?;
  let templates = evidence_templates(case_id);
  let mut players = state.players.write().await;
  let player = players
    .get_mut(player_id)
    .ok_or_else(|| ApiError::UnknownPlayer(player_id.to_string()))?;
  let completion = player.complete_case(&case, time_spent, templates, &state.economy);
  info!(
    target: "casebook_backend",
    %player_id,
    %case_id,
    points = completion.points_awarded,
    repeat = completion.is_repeat,
    level = completion.level,
    "Case completed"
  );
  Ok(completion)
}

/// Unlock an achievement; idempotent per player.
#[instrument(level = "info", skip(state), fields(%player_id, %achievement_id))]
pub async fn grant_achievement(
  state: &AppState,
  player_id: &str,
  achievement_id: &str,
) -> Result<(bool, Vec<String>), ApiError> {
  let mut players = state.players.write().await;
  let player = players
    .get_mut(player_id)
    .ok_or_else(|| ApiError::UnknownPlayer(player_id.to_string()))?;
  let unlocked = player.unlock_achievement(achievement_id);
  Ok((unlocked, player.achievements.clone()))
}

/// File a piece of evidence into the player's locker.
#[instrument(level = "info", skip(state, spec), fields(player_id = %spec.player_id, case_id = %spec.case_id))]
pub async fn add_evidence(state: &AppState, spec: EvidenceIn) -> Result<Evidence, ApiError> {
  let evidence = Evidence {
    id: Uuid::new_v4().to_string(),
    case_id: spec.case_id,
    title: spec.title,
    description: spec.description,
    kind: spec.kind,
    content: spec.content,
    importance: spec.importance,
    discovered_at: Utc::now(),
  };
  let mut players = state.players.write().await;
  let player = players
    .get_mut(&spec.player_id)
    .ok_or_else(|| ApiError::UnknownPlayer(spec.player_id.clone()))?;
  player.add_evidence(evidence.clone());
  Ok(evidence)
}

/// Fetch a profile, refreshing its last-seen stamp.
#[instrument(level = "debug", skip(state), fields(%player_id))]
pub async fn player_profile(state: &AppState, player_id: &str) -> Result<PlayerProfile, ApiError> {
  let mut players = state.players.write().await;
  let player = players
    .get_mut(player_id)
    .ok_or_else(|| ApiError::UnknownPlayer(player_id.to_string()))?;
  player.touch();
  Ok(player.clone())
}

/// Catalog listing. With a player id the entries carry lock/completion
/// annotations for that player.
#[instrument(level = "debug", skip(state, player_id))]
pub async fn case_listing(
  state: &AppState,
  player_id: Option<&str>,
) -> Result<Vec<CaseSummaryOut>, ApiError> {
  let player = match player_id {
    Some(id) => Some(
      state
        .get_player(id)
        .await
        .ok_or_else(|| ApiError::UnknownPlayer(id.to_string()))?,
    ),
    None => None,
  };
  let cases = state.list_cases().await;
  Ok(
    cases
      .iter()
      .map(|case| match &player {
        Some(p) => case_summary_out(
          case,
          Some(!p.unlocked_cases.contains(&case.id)),
          Some(p.completed_cases.contains(&case.id)),
        ),
        None => case_summary_out(case, None, None),
      })
      .collect(),
  )
}

#[instrument(level = "debug", skip(state), fields(%case_id))]
pub async fn case_detail(state: &AppState, case_id: &str) -> Result<CaseOut, ApiError> {
  let case = state
    .get_case(case_id)
    .await
    .ok_or_else(|| ApiError::UnknownCase(case_id.to_string()))?;
  Ok(case_out(&case))
}

#[instrument(level = "debug", skip(state), fields(%mission_id))]
pub async fn mission_detail(state: &AppState, mission_id: &str) -> Result<MissionOut, ApiError> {
  let (_case, mission) = state
    .get_mission(mission_id)
    .await
    .ok_or_else(|| ApiError::UnknownMission(mission_id.to_string()))?;
  Ok(mission_out(&mission))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn registration_pays_both_sides_of_a_referral() {
    let state = AppState::new();
    let (ada, outcome) = register_player(&state, "Ada", None).await;
    assert!(outcome.is_none());
    assert_eq!(ada.total_points, 500);

    let (bee, outcome) = register_player(&state, "Bee", Some(ada.referral_code.as_str())).await;
    let outcome = outcome.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Valid referral code from Ada");
    assert_eq!(bee.total_points, 700);
    assert_eq!(bee.hints, 3);
    assert_eq!(bee.referred_by.as_deref(), Some(ada.referral_code.as_str()));

    let ada = state.get_player(&ada.id).await.unwrap();
    assert_eq!(ada.total_points, 600);
    assert_eq!(ada.hints, 3);
    assert_eq!(ada.referral_stats.successful_referrals, 1);
    assert_eq!(ada.referral_stats.referral_history.len(), 1);
    assert_eq!(ada.referral_stats.referral_history[0].referred_player, bee.id);
  }

  #[tokio::test]
  async fn bad_referral_codes_never_block_registration() {
    let state = AppState::new();
    let (cay, outcome) = register_player(&state, "Cay", Some("NOPE99")).await;
    let outcome = outcome.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Invalid referral code - no user found with this code");
    assert_eq!(cay.total_points, 500);
    assert!(cay.referred_by.is_none());

    let (dee, outcome) = register_player(&state, "Dee", Some("SHORT")).await;
    assert_eq!(outcome.unwrap().message, "Referral code must be 6 characters long");
    assert_eq!(dee.hints, 2);
  }

  #[tokio::test]
  async fn applying_a_code_checks_in_the_documented_order() {
    let state = AppState::new();
    let (ada, _) = register_player(&state, "Ada", None).await;
    let (bee, _) = register_player(&state, "Bee", None).await;

    let err = apply_referral_code(&state, "ghost", &ada.referral_code).await;
    assert!(matches!(err, Err(ApiError::UnknownPlayer(_))));

    let out = apply_referral_code(&state, &bee.id, "abc").await.unwrap();
    assert_eq!(out.message, "Referral code must be 6 characters long");

    let out = apply_referral_code(&state, &bee.id, &bee.referral_code.to_lowercase())
      .await
      .unwrap();
    assert_eq!(out.message, "You cannot use your own referral code");

    let out = apply_referral_code(&state, &bee.id, "ZZZZZ9").await.unwrap();
    assert_eq!(out.message, "Invalid referral code - no user found with this code");

    let out = apply_referral_code(&state, &bee.id, &ada.referral_code).await.unwrap();
    assert!(out.success);
    let bee_now = state.get_player(&bee.id).await.unwrap();
    assert_eq!(bee_now.total_points, 700);
    assert_eq!(bee_now.referred_by.as_deref(), Some(ada.referral_code.as_str()));

    let out = apply_referral_code(&state, &bee.id, &ada.referral_code).await.unwrap();
    assert_eq!(out.message, "You have already used a referral code");
    let ada_now = state.get_player(&ada.id).await.unwrap();
    assert_eq!(ada_now.referral_stats.total_referrals, 1);
  }

  #[tokio::test]
  async fn hints_spend_down_and_then_refuse() {
    let state = AppState::new();
    let (player, _) = register_player(&state, "Ada", None).await;

    let (granted, text, left) = mission_hint(&state, "m-insta-clue", &player.id).await.unwrap();
    assert!(granted);
    assert!(text.unwrap().contains("display: block"));
    assert_eq!(left, 1);

    let (granted, _, left) = mission_hint(&state, "m-insta-clue", &player.id).await.unwrap();
    assert!(granted);
    assert_eq!(left, 0);

    let (granted, text, left) = mission_hint(&state, "m-insta-clue", &player.id).await.unwrap();
    assert!(!granted);
    assert!(text.is_none());
    assert_eq!(left, 0);

    let missing = mission_hint(&state, "m-nope", &player.id).await;
    assert!(matches!(missing, Err(ApiError::UnknownMission(_))));
  }

  #[tokio::test]
  async fn unlocks_and_completions_move_points_server_side() {
    let state = AppState::new();
    let (player, _) = register_player(&state, "Ada", None).await;

    // 500 points cannot cover the 600-point intermediate case.
    let (ok, message, points) =
      unlock_case(&state, &player.id, "case-social-media-stalker").await.unwrap();
    assert!(!ok);
    assert_eq!(message, "Insufficient points");
    assert_eq!(points, 500);

    let completion = complete_case(&state, &player.id, "case-vanishing-blogger", 300)
      .await
      .unwrap();
    assert_eq!(completion.points_awarded, 100);
    assert_eq!(completion.total_points, 600);
    assert_eq!(completion.new_evidence, 2);

    let (ok, message, points) =
      unlock_case(&state, &player.id, "case-social-media-stalker").await.unwrap();
    assert!(ok);
    assert_eq!(message, "Unlocked case: case-social-media-stalker");
    assert_eq!(points, 0);

    let (ok, message, _) =
      unlock_case(&state, &player.id, "case-social-media-stalker").await.unwrap();
    assert!(ok);
    assert_eq!(message, "Case already unlocked");

    let err = unlock_case(&state, &player.id, "case-nope").await;
    assert!(matches!(err, Err(ApiError::UnknownCase(_))));
  }

  #[tokio::test]
  async fn listings_annotate_lock_state_per_player() {
    let state = AppState::new();
    let anonymous = case_listing(&state, None).await.unwrap();
    assert_eq!(anonymous.len(), 7);
    assert!(anonymous.iter().all(|c| c.locked.is_none() && c.completed.is_none()));

    let (player, _) = register_player(&state, "Ada", None).await;
    let listed = case_listing(&state, Some(&player.id)).await.unwrap();
    let tutorial = listed.iter().find(|c| c.id == "case-vanishing-blogger").unwrap();
    assert_eq!(tutorial.locked, Some(false));
    assert_eq!(tutorial.completed, Some(false));
    let advanced = listed.iter().find(|c| c.id == "case-gaming-platform-hack").unwrap();
    assert_eq!(advanced.locked, Some(true));

    let unknown = case_listing(&state, Some("ghost")).await;
    assert!(matches!(unknown, Err(ApiError::UnknownPlayer(_))));
  }
}
