//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Unknown ids surface as 404s through `ApiError`; grading problems as 422s.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::logic::*;
use crate::profile::CaseCompletion;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, q), fields(with_player = q.player_id.is_some()))]
pub async fn http_list_cases(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CasesQuery>,
) -> Result<Json<Vec<CaseSummaryOut>>, ApiError> {
  let cases = case_listing(&state, q.player_id.as_deref()).await?;
  info!(target: "mission", count = cases.len(), "HTTP case list served");
  Ok(Json(cases))
}

#[instrument(level = "info", skip(state), fields(%q.case_id))]
pub async fn http_get_case(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CaseQuery>,
) -> Result<Json<CaseOut>, ApiError> {
  Ok(Json(case_detail(&state, &q.case_id).await?))
}

#[instrument(level = "info", skip(state), fields(%q.mission_id))]
pub async fn http_get_mission(
  State(state): State<Arc<AppState>>,
  Query(q): Query<MissionQuery>,
) -> Result<Json<MissionOut>, ApiError> {
  Ok(Json(mission_detail(&state, &q.mission_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.mission_id, html_len = body.html.len(), css_len = body.css.len()))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SubmitOut>, ApiError> {
  let report = submit_mission(&state, &body.mission_id, &body.html, &body.css).await?;
  info!(target: "mission", id = %body.mission_id, score = report.score, completed = report.is_completed, "HTTP submission graded");
  Ok(Json(SubmitOut { mission_id: body.mission_id, report }))
}

#[instrument(level = "info", skip(state), fields(%q.mission_id, %q.player_id))]
pub async fn http_get_hint(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HintQuery>,
) -> Result<Json<HintOut>, ApiError> {
  let (granted, text, hints_left) = mission_hint(&state, &q.mission_id, &q.player_id).await?;
  Ok(Json(HintOut { granted, text, hints_left }))
}

#[instrument(level = "info", skip(state, body), fields(%body.display_name))]
pub async fn http_post_register(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RegisterIn>,
) -> impl IntoResponse {
  let (profile, referral) =
    register_player(&state, &body.display_name, body.referral_code.as_deref()).await;
  Json(RegisterOut { profile, referral })
}

#[instrument(level = "info", skip(state), fields(%q.player_id))]
pub async fn http_get_profile(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ProfileQuery>,
) -> Result<impl IntoResponse, ApiError> {
  Ok(Json(player_profile(&state, &q.player_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.player_id, %body.case_id))]
pub async fn http_post_unlock_case(
  State(state): State<Arc<AppState>>,
  Json(body): Json<UnlockIn>,
) -> Result<Json<UnlockOut>, ApiError> {
  let (success, message, total_points) =
    unlock_case(&state, &body.player_id, &body.case_id).await?;
  Ok(Json(UnlockOut { success, message, total_points }))
}

#[instrument(level = "info", skip(state, body), fields(%body.player_id, %body.case_id, time_spent = body.time_spent))]
pub async fn http_post_complete_case(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CompleteCaseIn>,
) -> Result<Json<CaseCompletion>, ApiError> {
  let completion =
    complete_case(&state, &body.player_id, &body.case_id, body.time_spent).await?;
  Ok(Json(completion))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_referral_check(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ReferralCheckIn>,
) -> impl IntoResponse {
  Json(check_referral_code(&state, &body.code).await)
}

#[instrument(level = "info", skip(state, body), fields(%body.player_id))]
pub async fn http_post_referral_apply(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ReferralApplyIn>,
) -> Result<impl IntoResponse, ApiError> {
  Ok(Json(apply_referral_code(&state, &body.player_id, &body.code).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.player_id, %body.achievement_id))]
pub async fn http_post_achievement(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AchievementIn>,
) -> Result<Json<AchievementOut>, ApiError> {
  let (unlocked, achievements) =
    grant_achievement(&state, &body.player_id, &body.achievement_id).await?;
  Ok(Json(AchievementOut { unlocked, achievements }))
}

#[instrument(level = "info", skip(state, body), fields(%body.player_id, %body.case_id))]
pub async fn http_post_evidence(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EvidenceIn>,
) -> Result<Json<EvidenceOut>, ApiError> {
  let evidence = add_evidence(&state, body).await?;
  Ok(Json(EvidenceOut { evidence }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset_achievements(
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let updated_players = state.reset_all_achievements().await;
  info!(target: "casebook_backend", updated_players, "Achievements reset for all players");
  Json(AdminResetOut { success: true, updated_players })
}
