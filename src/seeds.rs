//! Seed data: the built-in case catalog and the evidence each case pays out.

use crate::domain::{CaseFile, CaseSource, Condition, Difficulty, Mission};
use crate::profile::{EvidenceKind, EvidenceTemplate, Importance};

/// Built-in catalog so the app is playable without any external config.
/// The first two cases ship with missions; the rest are catalog entries the
/// economy can price and unlock while their missions are in production.
pub fn seed_cases() -> Vec<CaseFile> {
  vec![
    vanishing_blogger(),
    visual_vanishing_blogger(),
    catalog_case(
      "case-social-media-stalker",
      "The Social Media Stalker",
      "Someone is harvesting personal data from profile pages. Trace the tracking script before more accounts go dark.",
      Difficulty::Intermediate,
      "25-35 min",
      200,
    ),
    catalog_case(
      "case-corporate-sabotage",
      "Corporate Sabotage",
      "A rival took down the big product presentation. Find the CSS that broke the layout at the worst possible moment.",
      Difficulty::Intermediate,
      "30-40 min",
      250,
    ),
    catalog_case(
      "case-dating-app-disaster",
      "Dating App Disaster",
      "Fake profiles are flooding the platform and the matches don't add up. Follow the manipulated data.",
      Difficulty::Intermediate,
      "25-35 min",
      225,
    ),
    catalog_case(
      "case-ecommerce-fraud",
      "The E-commerce Fraud",
      "Prices change at checkout and the money trail leads nowhere. Audit the storefront code.",
      Difficulty::Advanced,
      "35-45 min",
      300,
    ),
    catalog_case(
      "case-gaming-platform-hack",
      "The Gaming Platform Hack",
      "A tournament platform got breached through its own stylesheets. Reconstruct the exploit.",
      Difficulty::Advanced,
      "40-50 min",
      350,
    ),
  ]
}

fn vanishing_blogger() -> CaseFile {
  let case_id = "case-vanishing-blogger";
  CaseFile {
    id: case_id.into(),
    title: "The Vanishing Blogger".into(),
    description: "A popular blogger vanished mid-post. The last entries are still online, buried under markup that hides what really happened.".into(),
    difficulty: Difficulty::Beginner,
    duration: "15-20 min".into(),
    clue_points: 100,
    source: CaseSource::Seed,
    missions: vec![
      mission(
        "m-hidden-message",
        case_id,
        "Uncover the Hidden Message",
        "Sam's final post is still on the blog, but someone buried it with a hidden attribute and a wall of <center> tags. Clean up the markup and make the message readable.",
        r#"<body>
  <h1>The Case of the Vanishing Blogger</h1>
  <center>
    <h2>Sam's final post</h2>
    <p hidden>Check my last insta story. The truth about NovaCorp goes live at midnight. Sam out.</p>
  </center>
</body>"#,
        r#"body {
  font-family: georgia, serif;
  margin: 2rem;
}"#,
        Some("Delete the hidden attribute and the <center> pair, then give .revealed-message a border so the message reads like evidence."),
        &[
          "Remove the hidden attribute and make the message visible",
          "Replace <center> tags with proper HTML structure",
          "Apply proper CSS styling for the revealed message",
        ],
      ),
      mission(
        "m-insta-clue",
        case_id,
        "Restore the Instagram Clue",
        "Sam's last story was embedded on the evidence board, then switched off with display: none. Bring the #insta-clue element back.",
        r#"<body>
  <h2>Instagram Evidence Board</h2>
  <div id="insta-clue" class="social-post">
    <p>Last story, 11:47 PM: "If something happens to me, the drafts folder has everything."</p>
  </div>
</body>"#,
        r#"#insta-clue {
  display: none;
}"#,
        Some("The clue never left the page. Find #insta-clue in the stylesheet and trade display: none for display: block."),
        &[
          "Change display: none to display: block on #insta-clue element",
          "Style the revealed Instagram evidence section appropriately",
        ],
      ),
      mission(
        "m-address-clue",
        case_id,
        "Reveal the Meeting Address",
        "A deleted draft names a meeting place. The address sits behind visibility: hidden and the note is wrapped in <font> tags. Surface it and style it like evidence.",
        r#"<body>
  <h2>Deleted Draft</h2>
  <font color="red">If I go quiet, look where they keep the crates.</font>
  <p id="address-clue">Warehouse 17, Dockside Street, 12:00 AM.</p>
</body>"#,
        r#"#address-clue {
  visibility: hidden;
}"#,
        Some("Two edits: visibility: visible on #address-clue, and replace the <font> tag with a CSS rule."),
        &[
          "Change visibility: hidden to visibility: visible on #address-clue",
          "Replace <font> tags with modern CSS styling",
          "Apply proper styling to the revealed location information",
        ],
      ),
    ],
  }
}

fn visual_vanishing_blogger() -> CaseFile {
  let case_id = "visual-vanishing-blogger";
  CaseFile {
    id: case_id.into(),
    title: "The Vanishing Blogger: Remastered".into(),
    description: "The blog came back from a 2004 backup, table-era markup and all. Modernize the layout to surface what the old structure buried.".into(),
    difficulty: Difficulty::Beginner,
    duration: "20-30 min".into(),
    clue_points: 150,
    source: CaseSource::Seed,
    missions: vec![mission(
      "m-archive-layout",
      case_id,
      "Modernize the Archive Layout",
      "The restore brought back 2004-era markup. Rebuild the page with semantic elements so the evidence reads top to bottom.",
      r#"<body>
  <center>
    <h1>The Vanishing Blogger: Archive</h1>
    <p>Restored from a 2004 backup. Original layout preserved.</p>
  </center>
</body>"#,
      r#"body {
  width: 640px;
}"#,
      Some("Swap the <center> wrapper for <header>, <main> and <footer> inside <body>."),
      &[
        "Replace <center> tags with proper semantic HTML elements",
        "Use modern HTML5 semantic elements (header, main, footer)",
      ],
    )],
  }
}

fn catalog_case(
  id: &str,
  title: &str,
  description: &str,
  difficulty: Difficulty,
  duration: &str,
  clue_points: u32,
) -> CaseFile {
  CaseFile {
    id: id.into(),
    title: title.into(),
    description: description.into(),
    difficulty,
    duration: duration.into(),
    clue_points,
    source: CaseSource::Seed,
    missions: vec![],
  }
}

fn mission(
  id: &str,
  case_id: &str,
  title: &str,
  briefing: &str,
  starter_html: &str,
  starter_css: &str,
  hint: Option<&str>,
  condition_labels: &[&str],
) -> Mission {
  Mission {
    id: id.into(),
    case_id: case_id.into(),
    title: title.into(),
    briefing: briefing.into(),
    starter_html: starter_html.into(),
    starter_css: starter_css.into(),
    hint: hint.map(str::to_string),
    conditions: condition_labels.iter().copied().map(Condition::new).collect(),
  }
}

/// Evidence handed out the first time a case is completed.
pub fn evidence_templates(case_id: &str) -> &'static [EvidenceTemplate] {
  match case_id {
    "case-vanishing-blogger" => &VANISHING_BLOGGER_EVIDENCE,
    "visual-vanishing-blogger" => &VISUAL_VANISHING_BLOGGER_EVIDENCE,
    "case-social-media-stalker" => &SOCIAL_MEDIA_STALKER_EVIDENCE,
    "case-corporate-sabotage" => &CORPORATE_SABOTAGE_EVIDENCE,
    "case-dating-app-disaster" => &DATING_APP_DISASTER_EVIDENCE,
    "case-ecommerce-fraud" => &ECOMMERCE_FRAUD_EVIDENCE,
    "case-gaming-platform-hack" => &GAMING_PLATFORM_HACK_EVIDENCE,
    _ => &[],
  }
}

const VANISHING_BLOGGER_EVIDENCE: [EvidenceTemplate; 2] = [
  EvidenceTemplate {
    title: "Corrupted Blog HTML",
    description: "Found broken HTML tags that were hiding Sam's last message",
    kind: EvidenceKind::Code,
    content: "<h2> tags were preventing proper display of the blog content",
    importance: Importance::High,
  },
  EvidenceTemplate {
    title: "Hidden CSS Clue",
    description: "Discovered a secret message hidden in the CSS code",
    kind: EvidenceKind::Clue,
    content: "Sam left breadcrumbs about checking backup files on old server",
    importance: Importance::Critical,
  },
];

const VISUAL_VANISHING_BLOGGER_EVIDENCE: [EvidenceTemplate; 3] = [
  EvidenceTemplate {
    title: "Rishi's Encrypted Notes",
    description: "Found encrypted documents about suspicious Sherpa companies",
    kind: EvidenceKind::Document,
    content: "Rishi's research revealed multiple fake Sherpa certification schemes targeting climbers",
    importance: Importance::Critical,
  },
  EvidenceTemplate {
    title: "Hidden CSS Evidence",
    description: "Discovered hidden HTML elements revealing the truth",
    kind: EvidenceKind::Code,
    content: "CSS visibility properties were concealing crucial evidence about Rishi's whereabouts",
    importance: Importance::High,
  },
  EvidenceTemplate {
    title: "Phone Message Clue",
    description: "Decoded the final message from Rishi's device",
    kind: EvidenceKind::Clue,
    content: "Rishi wasn't kidnapped - he went into hiding after exposing the corruption",
    importance: Importance::Critical,
  },
];

const SOCIAL_MEDIA_STALKER_EVIDENCE: [EvidenceTemplate; 2] = [
  EvidenceTemplate {
    title: "Malicious Script Code",
    description: "Found hidden JavaScript code used for tracking users",
    kind: EvidenceKind::Code,
    content: "Tracking script embedded in profile pages",
    importance: Importance::Critical,
  },
  EvidenceTemplate {
    title: "User Data Logs",
    description: "Discovered logs of unauthorized data collection",
    kind: EvidenceKind::Document,
    content: "Log files show systematic harvesting of personal information",
    importance: Importance::High,
  },
];

const CORPORATE_SABOTAGE_EVIDENCE: [EvidenceTemplate; 2] = [
  EvidenceTemplate {
    title: "Sabotaged Website Code",
    description: "Identified malicious code injected into company website",
    kind: EvidenceKind::Code,
    content: "Hidden CSS rules causing layout failures during presentation",
    importance: Importance::Critical,
  },
  EvidenceTemplate {
    title: "Internal Email Trail",
    description: "Corporate communications revealing the sabotage plot",
    kind: EvidenceKind::Document,
    content: "Email evidence shows coordinated effort to undermine the company presentation",
    importance: Importance::High,
  },
];

const DATING_APP_DISASTER_EVIDENCE: [EvidenceTemplate; 2] = [
  EvidenceTemplate {
    title: "Profile Manipulation Code",
    description: "Code used to alter user profiles and create fake matches",
    kind: EvidenceKind::Code,
    content: "JavaScript functions for profile data manipulation",
    importance: Importance::Critical,
  },
  EvidenceTemplate {
    title: "Fake Profile Database",
    description: "Database of artificially created dating profiles",
    kind: EvidenceKind::Document,
    content: "Systematic creation of fake profiles to manipulate user engagement",
    importance: Importance::High,
  },
];

const ECOMMERCE_FRAUD_EVIDENCE: [EvidenceTemplate; 2] = [
  EvidenceTemplate {
    title: "Price Manipulation Script",
    description: "Hidden code altering product prices at checkout",
    kind: EvidenceKind::Code,
    content: "JavaScript code modifying DOM elements during payment process",
    importance: Importance::Critical,
  },
  EvidenceTemplate {
    title: "Financial Transaction Logs",
    description: "Evidence of fraudulent pricing modifications",
    kind: EvidenceKind::Document,
    content: "Log files showing systematic price manipulation affecting customer payments",
    importance: Importance::Critical,
  },
];

const GAMING_PLATFORM_HACK_EVIDENCE: [EvidenceTemplate; 2] = [
  EvidenceTemplate {
    title: "Exploit Code",
    description: "Code used to exploit gaming platform vulnerabilities",
    kind: EvidenceKind::Code,
    content: "CSS and JavaScript exploits for unauthorized access",
    importance: Importance::Critical,
  },
  EvidenceTemplate {
    title: "Hack Methodology Document",
    description: "Step-by-step guide used by hackers to breach the platform",
    kind: EvidenceKind::Document,
    content: "Detailed instructions for exploiting CSS injection vulnerabilities in gaming platforms",
    importance: Importance::High,
  },
];
