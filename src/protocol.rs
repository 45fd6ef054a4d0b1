//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{CaseFile, CaseSource, Difficulty, Mission};
use crate::profile::{CaseCompletion, Evidence, EvidenceKind, Importance, PlayerProfile, ReferralOutcome};
use crate::validator::MissionReport;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListCases {
        #[serde(rename = "playerId")]
        player_id: Option<String>,
    },
    GetCase {
        #[serde(rename = "caseId")]
        case_id: String,
    },
    GetMission {
        #[serde(rename = "missionId")]
        mission_id: String,
    },
    SubmitMission {
        #[serde(rename = "missionId")]
        mission_id: String,
        html: String,
        css: String,
    },
    Hint {
        #[serde(rename = "missionId")]
        mission_id: String,
        #[serde(rename = "playerId")]
        player_id: String,
    },
    UnlockCase {
        #[serde(rename = "playerId")]
        player_id: String,
        #[serde(rename = "caseId")]
        case_id: String,
    },
    CompleteCase {
        #[serde(rename = "playerId")]
        player_id: String,
        #[serde(rename = "caseId")]
        case_id: String,
        #[serde(rename = "timeSpent")]
        time_spent: u32,
    },
    GetProfile {
        #[serde(rename = "playerId")]
        player_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    CaseList {
        cases: Vec<CaseSummaryOut>,
    },
    Case {
        case: CaseOut,
    },
    Mission {
        mission: MissionOut,
    },
    MissionResult {
        #[serde(rename = "missionId")]
        mission_id: String,
        report: MissionReport,
    },
    Hint {
        granted: bool,
        text: Option<String>,
        #[serde(rename = "hintsLeft")]
        hints_left: u32,
    },
    CaseUnlocked {
        success: bool,
        message: String,
        #[serde(rename = "totalPoints")]
        total_points: u32,
    },
    CaseCompleted {
        result: CaseCompletion,
    },
    Profile {
        profile: PlayerProfile,
    },
    Error {
        message: String,
    },
}

/// Catalog entry DTO. `locked`/`completed` are per-player annotations and
/// stay null when the listing was requested without a player.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummaryOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub clue_points: u32,
    pub unlock_cost: u32,
    pub mission_count: usize,
    pub source: CaseSource,
    pub locked: Option<bool>,
    pub completed: Option<bool>,
}

/// Full case DTO with mission summaries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub clue_points: u32,
    pub unlock_cost: u32,
    pub source: CaseSource,
    pub missions: Vec<MissionSummaryOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionSummaryOut {
    pub id: String,
    pub title: String,
    pub condition_count: usize,
}

/// Playable mission DTO: briefing, starter files and the condition labels.
/// The hint is withheld; it costs one from the player's hint budget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionOut {
    pub id: String,
    pub case_id: String,
    pub title: String,
    pub briefing: String,
    pub starter_html: String,
    pub starter_css: String,
    pub conditions: Vec<String>,
}

pub fn case_summary_out(
    case: &CaseFile,
    locked: Option<bool>,
    completed: Option<bool>,
) -> CaseSummaryOut {
    CaseSummaryOut {
        id: case.id.clone(),
        title: case.title.clone(),
        description: case.description.clone(),
        difficulty: case.difficulty,
        duration: case.duration.clone(),
        clue_points: case.clue_points,
        unlock_cost: case.unlock_cost(),
        mission_count: case.missions.len(),
        source: case.source,
        locked,
        completed,
    }
}

pub fn case_out(case: &CaseFile) -> CaseOut {
    CaseOut {
        id: case.id.clone(),
        title: case.title.clone(),
        description: case.description.clone(),
        difficulty: case.difficulty,
        duration: case.duration.clone(),
        clue_points: case.clue_points,
        unlock_cost: case.unlock_cost(),
        source: case.source,
        missions: case
            .missions
            .iter()
            .map(|m| MissionSummaryOut {
                id: m.id.clone(),
                title: m.title.clone(),
                condition_count: m.conditions.len(),
            })
            .collect(),
    }
}

pub fn mission_out(mission: &Mission) -> MissionOut {
    MissionOut {
        id: mission.id.clone(),
        case_id: mission.case_id.clone(),
        title: mission.title.clone(),
        briefing: mission.briefing.clone(),
        starter_html: mission.starter_html.clone(),
        starter_css: mission.starter_css.clone(),
        conditions: mission.conditions.iter().map(|c| c.label.clone()).collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct CasesQuery {
    #[serde(rename = "playerId")]
    pub player_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaseQuery {
    #[serde(rename = "caseId")]
    pub case_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MissionQuery {
    #[serde(rename = "missionId")]
    pub mission_id: String,
}

#[derive(Deserialize)]
pub struct SubmitIn {
    #[serde(rename = "missionId")]
    pub mission_id: String,
    pub html: String,
    pub css: String,
}
#[derive(Serialize)]
pub struct SubmitOut {
    #[serde(rename = "missionId")]
    pub mission_id: String,
    pub report: MissionReport,
}

#[derive(Debug, Deserialize)]
pub struct HintQuery {
    #[serde(rename = "missionId")]
    pub mission_id: String,
    #[serde(rename = "playerId")]
    pub player_id: String,
}
#[derive(Serialize)]
pub struct HintOut {
    pub granted: bool,
    pub text: Option<String>,
    #[serde(rename = "hintsLeft")]
    pub hints_left: u32,
}

#[derive(Deserialize)]
pub struct RegisterIn {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "referralCode")]
    pub referral_code: Option<String>,
}
#[derive(Serialize)]
pub struct RegisterOut {
    pub profile: PlayerProfile,
    /// Present when a referral code was submitted with the registration.
    pub referral: Option<ReferralOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Deserialize)]
pub struct UnlockIn {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "caseId")]
    pub case_id: String,
}
#[derive(Serialize)]
pub struct UnlockOut {
    pub success: bool,
    pub message: String,
    #[serde(rename = "totalPoints")]
    pub total_points: u32,
}

#[derive(Deserialize)]
pub struct CompleteCaseIn {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "caseId")]
    pub case_id: String,
    #[serde(rename = "timeSpent")]
    pub time_spent: u32,
}

#[derive(Deserialize)]
pub struct ReferralCheckIn {
    pub code: String,
}

#[derive(Deserialize)]
pub struct ReferralApplyIn {
    #[serde(rename = "playerId")]
    pub player_id: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct AchievementIn {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "achievementId")]
    pub achievement_id: String,
}
#[derive(Serialize)]
pub struct AchievementOut {
    pub unlocked: bool,
    pub achievements: Vec<String>,
}

#[derive(Deserialize)]
pub struct EvidenceIn {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "caseId")]
    pub case_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
    pub content: String,
    pub importance: Importance,
}
#[derive(Serialize)]
pub struct EvidenceOut {
    pub evidence: Evidence,
}

#[derive(Serialize)]
pub struct AdminResetOut {
    pub success: bool,
    #[serde(rename = "updatedPlayers")]
    pub updated_players: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_from_tagged_json() {
        let msg: ClientWsMessage = serde_json::from_str(
            r#"{"type":"submit_mission","missionId":"m-insta-clue","html":"<p></p>","css":""}"#,
        )
        .unwrap();
        match msg {
            ClientWsMessage::SubmitMission { mission_id, html, css } => {
                assert_eq!(mission_id, "m-insta-clue");
                assert_eq!(html, "<p></p>");
                assert!(css.is_empty());
            }
            other => panic!("parsed the wrong variant: {other:?}"),
        }
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"ping"}"#).is_ok());
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"warp_drive"}"#).is_err());
    }

    #[test]
    fn server_messages_carry_the_type_tag() {
        let json = serde_json::to_string(&ServerWsMessage::Hint {
            granted: true,
            text: Some("look again".into()),
            hints_left: 1,
        })
        .unwrap();
        assert!(json.contains(r#""type":"hint""#));
        assert!(json.contains(r#""hintsLeft":1"#));
    }

    #[test]
    fn case_summaries_expose_the_unlock_price() {
        let case = crate::seeds::seed_cases().remove(2);
        let out = case_summary_out(&case, Some(true), Some(false));
        assert_eq!(out.id, "case-social-media-stalker");
        assert_eq!(out.unlock_cost, 600);
        assert_eq!(out.mission_count, 0);
        assert_eq!(out.locked, Some(true));
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains(r#""cluePoints":200"#));
        assert!(json.contains(r#""difficulty":"intermediate""#));
    }
}
