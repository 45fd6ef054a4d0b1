//! Mission grading.
//!
//! A submission is the pair of HTML and CSS buffers from the player's editor.
//! Each mission names its success conditions by label; every label in the
//! closed vocabulary maps to one `Rule`, a fixed combination of the surface
//! checks in `crate::markup`. Grading lower-cases the buffers once, evaluates
//! every rule, and returns a `MissionReport` whose feedback lines keep the
//! mission's condition order.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::Condition;
use crate::markup;

/// A fully solved mission always reports this score.
pub const MAX_SCORE: u32 = 100;

/// The closed vocabulary of success conditions missions can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
  // "The Vanishing Blogger", act 1: uncover the farewell post.
  RevealHiddenMessage,
  ReplaceCenterTags,
  StyleRevealedMessage,
  // Act 2: bring back the Instagram clue.
  ShowInstaClue,
  StyleInstaClue,
  // Act 3: surface the meeting address.
  ShowAddressClue,
  ReplaceFontTags,
  StyleAddressClue,
  // Remastered edition: modernize the legacy blog layout.
  ReplaceCenterWithSemantic,
  UseSemanticLayout,
}

impl Rule {
  pub const ALL: [Rule; 10] = [
    Rule::RevealHiddenMessage,
    Rule::ReplaceCenterTags,
    Rule::StyleRevealedMessage,
    Rule::ShowInstaClue,
    Rule::StyleInstaClue,
    Rule::ShowAddressClue,
    Rule::ReplaceFontTags,
    Rule::StyleAddressClue,
    Rule::ReplaceCenterWithSemantic,
    Rule::UseSemanticLayout,
  ];

  /// The label under which case banks and seeds refer to this rule.
  pub fn label(&self) -> &'static str {
    match self {
      Rule::RevealHiddenMessage => "Remove the hidden attribute and make the message visible",
      Rule::ReplaceCenterTags => "Replace <center> tags with proper HTML structure",
      Rule::StyleRevealedMessage => "Apply proper CSS styling for the revealed message",
      Rule::ShowInstaClue => "Change display: none to display: block on #insta-clue element",
      Rule::StyleInstaClue => "Style the revealed Instagram evidence section appropriately",
      Rule::ShowAddressClue => "Change visibility: hidden to visibility: visible on #address-clue",
      Rule::ReplaceFontTags => "Replace <font> tags with modern CSS styling",
      Rule::StyleAddressClue => "Apply proper styling to the revealed location information",
      Rule::ReplaceCenterWithSemantic => "Replace <center> tags with proper semantic HTML elements",
      Rule::UseSemanticLayout => "Use modern HTML5 semantic elements (header, main, footer)",
    }
  }

  /// Exact label lookup. Returns `None` for labels outside the vocabulary.
  pub fn for_label(label: &str) -> Option<Rule> {
    Rule::ALL.into_iter().find(|rule| rule.label() == label)
  }

  /// Whether the submission satisfies this rule. Both buffers must already
  /// be lower-cased.
  pub fn holds(&self, html: &str, css: &str) -> bool {
    match self {
      Rule::RevealHiddenMessage => {
        !markup::has_bare_hidden_attr(html)
          && !markup::has_inline_display_none(html)
          && html.contains("check my last insta story")
      }
      Rule::ReplaceCenterTags => {
        !markup::has_open_tag(html, "center")
          && !markup::has_close_tag(html, "center")
          && (html.contains("the truth about novacorp") || html.contains("sam out"))
      }
      Rule::StyleRevealedMessage => {
        markup::has_selector(css, ".revealed-message")
          || markup::has_selector(css, ".hidden-message")
          || markup::has_property(css, "background")
          || markup::has_property(css, "border")
          || markup::has_property(css, "animation")
      }
      Rule::ShowInstaClue => {
        markup::targets_element(html, css, "insta-clue")
          && markup::has_declaration(css, "display", "block")
          && !markup::has_declaration(css, "display", "none")
      }
      Rule::StyleInstaClue => {
        markup::has_selector(css, "#insta-clue")
          || markup::has_selector(css, ".instagram-evidence")
          || markup::has_selector(css, ".social-post")
          || markup::has_property(css, "border")
          || markup::has_property(css, "animation")
          || markup::has_property(css, "background")
      }
      Rule::ShowAddressClue => {
        markup::targets_element(html, css, "address-clue")
          && markup::has_declaration(css, "visibility", "visible")
          && !markup::has_declaration(css, "visibility", "hidden")
      }
      Rule::ReplaceFontTags => {
        !markup::has_tag_start(html, "font")
          && !markup::has_close_tag(html, "font")
          && (html.contains("warehouse 17")
            || html.contains("dockside street")
            || html.contains("12:00 am")
            || html.contains("address-clue"))
      }
      Rule::StyleAddressClue => {
        markup::has_selector(css, "#address-clue")
          || markup::has_selector(css, ".location-clue")
          || markup::has_selector(css, ".critical-location")
          || markup::has_property(css, "color")
          || markup::has_property(css, "font-size")
          || markup::has_property(css, "background")
          || markup::has_property(css, "animation")
          || markup::has_property(css, "border")
      }
      Rule::ReplaceCenterWithSemantic => {
        !markup::has_open_tag(html, "center")
          && !markup::has_close_tag(html, "center")
          && (markup::has_open_tag(html, "header")
            || markup::has_open_tag(html, "footer")
            || markup::has_open_tag(html, "main"))
          && markup::has_open_tag(html, "body")
      }
      Rule::UseSemanticLayout => {
        markup::has_open_tag(html, "header")
          && markup::has_open_tag(html, "main")
          && (markup::has_open_tag(html, "footer") || markup::has_close_tag(html, "body"))
      }
    }
  }
}

/// Outcome of grading one submission against one mission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionReport {
  pub is_completed: bool,
  /// Mirrors `is_completed`; the client uses it to play the clue reveal.
  pub clue_unlocked: bool,
  pub completed_conditions: Vec<String>,
  pub remaining_conditions: Vec<String>,
  pub score: u32,
  pub max_score: u32,
  /// One line per condition, in mission order: "✅ {label}" or "❌ {label}".
  pub feedback: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradeError {
  #[error("mission has no success conditions")]
  NoConditions,
}

/// Grade a submission. The score is the met share of conditions, scaled to
/// `MAX_SCORE` and rounded to the nearest point.
pub fn evaluate_mission(
  html: &str,
  css: &str,
  conditions: &[Condition],
) -> Result<MissionReport, GradeError> {
  if conditions.is_empty() {
    return Err(GradeError::NoConditions);
  }

  // All rules compare against lower-cased text so markup case never matters.
  let html = html.to_lowercase();
  let css = css.to_lowercase();

  let mut completed = Vec::new();
  let mut remaining = Vec::new();
  let mut feedback = Vec::with_capacity(conditions.len());

  for condition in conditions {
    let met = match condition.rule {
      Some(rule) => rule.holds(&html, &css),
      None => {
        warn!(target: "mission", label = %condition.label, "unknown success condition, counting as unmet");
        false
      }
    };
    if met {
      completed.push(condition.label.clone());
      feedback.push(format!("✅ {}", condition.label));
    } else {
      remaining.push(condition.label.clone());
      feedback.push(format!("❌ {}", condition.label));
    }
  }

  let score = (completed.len() as f64 * MAX_SCORE as f64 / conditions.len() as f64).round() as u32;
  let is_completed = remaining.is_empty();

  Ok(MissionReport {
    is_completed,
    clue_unlocked: is_completed,
    completed_conditions: completed,
    remaining_conditions: remaining,
    score,
    max_score: MAX_SCORE,
    feedback,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn conditions(labels: &[&str]) -> Vec<Condition> {
    labels.iter().copied().map(Condition::new).collect()
  }

  #[test]
  fn every_label_round_trips_through_lookup() {
    for rule in Rule::ALL {
      assert_eq!(Rule::for_label(rule.label()), Some(rule));
    }
    assert_eq!(Rule::for_label("Defragment the mainframe"), None);
  }

  #[test]
  fn each_rule_has_passing_and_failing_samples() {
    // (rule, pass html, pass css, fail html, fail css), all pre-lower-cased.
    let samples: [(Rule, &str, &str, &str, &str); 10] = [
      (
        Rule::RevealHiddenMessage,
        r#"<p class="msg">check my last insta story</p>"#,
        "",
        "<p hidden>check my last insta story</p>",
        "",
      ),
      (
        Rule::ReplaceCenterTags,
        "<h1>the truth about novacorp</h1>",
        "",
        "<center>sam out</center>",
        "",
      ),
      (
        Rule::StyleRevealedMessage,
        "",
        ".revealed-message { color: #9ef; }",
        "",
        "p { margin: 0; }",
      ),
      (
        Rule::ShowInstaClue,
        "",
        "#insta-clue { display: block; }",
        "",
        "#insta-clue { display: none; }",
      ),
      (
        Rule::StyleInstaClue,
        "",
        ".social-post { padding: 4px; }",
        "",
        "p { margin: 0; }",
      ),
      (
        Rule::ShowAddressClue,
        "",
        "#address-clue { visibility: visible; }",
        "",
        "#address-clue { visibility: hidden; }",
      ),
      (
        Rule::ReplaceFontTags,
        "<p>meet at warehouse 17</p>",
        "",
        r#"<font size="4">warehouse 17</font>"#,
        "",
      ),
      (
        Rule::StyleAddressClue,
        "",
        ".location-clue { border: 1px solid; }",
        "",
        "p { margin: 0; }",
      ),
      (
        Rule::ReplaceCenterWithSemantic,
        "<body><header>case notes</header></body>",
        "",
        "<body><center>case notes</center></body>",
        "",
      ),
      (
        Rule::UseSemanticLayout,
        "<header>h</header><main>m</main><footer>f</footer>",
        "",
        "<main>m</main>",
        "",
      ),
    ];
    for (rule, pass_html, pass_css, fail_html, fail_css) in samples {
      assert!(rule.holds(pass_html, pass_css), "{} should pass", rule.label());
      assert!(!rule.holds(fail_html, fail_css), "{} should fail", rule.label());
    }
  }

  #[test]
  fn partial_submission_scores_the_met_share() {
    let conds = conditions(&[
      "Apply proper CSS styling for the revealed message",
      "Use modern HTML5 semantic elements (header, main, footer)",
      "Replace <font> tags with modern CSS styling",
    ]);
    let html = "<body><p>meet at warehouse 17</p></body>";
    let css = ".location-clue { border: 1px solid; }";
    let report = evaluate_mission(html, css, &conds).unwrap();

    assert!(!report.is_completed);
    assert!(!report.clue_unlocked);
    assert_eq!(report.score, 67);
    assert_eq!(report.max_score, MAX_SCORE);
    assert_eq!(
      report.completed_conditions,
      vec![
        "Apply proper CSS styling for the revealed message".to_string(),
        "Replace <font> tags with modern CSS styling".to_string(),
      ]
    );
    assert_eq!(
      report.remaining_conditions,
      vec!["Use modern HTML5 semantic elements (header, main, footer)".to_string()]
    );
    assert_eq!(
      report.feedback,
      vec![
        "✅ Apply proper CSS styling for the revealed message".to_string(),
        "❌ Use modern HTML5 semantic elements (header, main, footer)".to_string(),
        "✅ Replace <font> tags with modern CSS styling".to_string(),
      ]
    );
  }

  #[test]
  fn fixing_a_condition_never_lowers_the_score() {
    let conds = conditions(&[
      "Apply proper CSS styling for the revealed message",
      "Use modern HTML5 semantic elements (header, main, footer)",
      "Replace <font> tags with modern CSS styling",
    ]);
    let css = ".location-clue { border: 1px solid; }";
    let before =
      evaluate_mission("<body><p>meet at warehouse 17</p></body>", css, &conds).unwrap();
    let after = evaluate_mission(
      "<body><header>files</header><main><p>meet at warehouse 17</p></main></body>",
      css,
      &conds,
    )
    .unwrap();

    assert!(after.score >= before.score);
    assert_eq!(after.score, MAX_SCORE);
    assert!(after.is_completed);
    assert!(after.clue_unlocked);
  }

  #[test]
  fn grading_ignores_markup_case() {
    let conds = conditions(&["Use modern HTML5 semantic elements (header, main, footer)"]);
    let report = evaluate_mission(
      "<HEADER>H</HEADER><MAIN>M</MAIN><FOOTER>F</FOOTER>",
      "",
      &conds,
    )
    .unwrap();
    assert!(report.is_completed);
    assert_eq!(report.score, MAX_SCORE);
  }

  #[test]
  fn full_solve_reports_max_score() {
    let conds = conditions(&[
      "Remove the hidden attribute and make the message visible",
      "Replace <center> tags with proper HTML structure",
      "Apply proper CSS styling for the revealed message",
    ]);
    let html = concat!(
      "<body><h1>sam's last post</h1>",
      r#"<p class="revealed-message">check my last insta story</p>"#,
      "<p>the truth about novacorp</p></body>",
    );
    let css = ".revealed-message { background: #fffbe6; border: 1px solid #222; }";
    let report = evaluate_mission(html, css, &conds).unwrap();

    assert!(report.is_completed);
    assert!(report.clue_unlocked);
    assert_eq!(report.score, MAX_SCORE);
    assert!(report.remaining_conditions.is_empty());
    assert!(report.feedback.iter().all(|line| line.starts_with("✅ ")));
  }

  #[test]
  fn unknown_labels_count_as_unmet_without_failing_the_grade() {
    let conds = conditions(&["Align the ransom note to the left"]);
    let report = evaluate_mission("<p>x</p>", "", &conds).unwrap();
    assert!(!report.is_completed);
    assert_eq!(report.score, 0);
    assert_eq!(
      report.remaining_conditions,
      vec!["Align the ransom note to the left".to_string()]
    );
  }

  #[test]
  fn missions_without_conditions_are_rejected() {
    assert_eq!(
      evaluate_mission("<p>x</p>", "", &[]),
      Err(GradeError::NoConditions)
    );
  }
}
