//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "casebook_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "casebook_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        debug!(target: "casebook_backend", raw = %trunc_for_log(&txt, 200), "WS received");
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "casebook_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "casebook_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, msg))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListCases { player_id } => {
      match case_listing(state, player_id.as_deref()).await {
        Ok(cases) => {
          tracing::info!(target: "mission", count = cases.len(), "WS case list served");
          ServerWsMessage::CaseList { cases }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::GetCase { case_id } => match case_detail(state, &case_id).await {
      Ok(case) => ServerWsMessage::Case { case },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::GetMission { mission_id } => match mission_detail(state, &mission_id).await {
      Ok(mission) => ServerWsMessage::Mission { mission },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::SubmitMission { mission_id, html, css } => {
      match submit_mission(state, &mission_id, &html, &css).await {
        Ok(report) => {
          tracing::info!(target: "mission", id = %mission_id, score = report.score, completed = report.is_completed, "WS submission graded");
          ServerWsMessage::MissionResult { mission_id, report }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::Hint { mission_id, player_id } => {
      match mission_hint(state, &mission_id, &player_id).await {
        Ok((granted, text, hints_left)) => {
          tracing::info!(target: "casebook_backend", id = %mission_id, granted, "WS hint served");
          ServerWsMessage::Hint { granted, text, hints_left }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::UnlockCase { player_id, case_id } => {
      match unlock_case(state, &player_id, &case_id).await {
        Ok((success, message, total_points)) => {
          ServerWsMessage::CaseUnlocked { success, message, total_points }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::CompleteCase { player_id, case_id, time_spent } => {
      match complete_case(state, &player_id, &case_id, time_spent).await {
        Ok(result) => ServerWsMessage::CaseCompleted { result },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::GetProfile { player_id } => match player_profile(state, &player_id).await {
      Ok(profile) => ServerWsMessage::Profile { profile },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },
  }
}
