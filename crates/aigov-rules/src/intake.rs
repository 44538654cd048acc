//! Intake scorecard: triages a project into a risk-handling track.
//!
//! A fixed bank of ten questions, each option scored 0-10 (higher means less
//! risk). The sum of answered scores is normalized against the best possible
//! sum and mapped onto a [`RiskPath`].

use serde::{Deserialize, Serialize};

/// Normalized score at or above which a project is fast-tracked.
pub const FAST_TRACK_THRESHOLD: u8 = 75;
/// Lower bound of the `standard` band.
pub const STANDARD_THRESHOLD: u8 = 60;
/// Lower bound of the `elevated_review` band. Anything below is `high_risk`.
pub const ELEVATED_REVIEW_THRESHOLD: u8 = 45;

/// One selectable answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IntakeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub score: u32,
}

/// A scorecard question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IntakeQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: &'static [IntakeOption],
}

impl IntakeQuestion {
    /// Highest option score, found by value rather than position.
    pub fn max_score(&self) -> u32 {
        self.options.iter().map(|o| o.score).max().unwrap_or(0)
    }

    pub fn option(&self, value: &str) -> Option<&'static IntakeOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

const fn opt(value: &'static str, label: &'static str, score: u32) -> IntakeOption {
    IntakeOption {
        value,
        label,
        score,
    }
}

/// The fixed question bank.
pub static QUESTION_BANK: [IntakeQuestion; 10] = [
    IntakeQuestion {
        id: "data_sensitivity",
        prompt: "What is the most sensitive data the system processes?",
        options: &[
            opt("public", "Public or synthetic data only", 10),
            opt("internal", "Internal business data", 7),
            opt("personal", "Personal data", 3),
            opt("special_category", "Special-category or regulated data", 0),
        ],
    },
    IntakeQuestion {
        id: "decision_impact",
        prompt: "How consequential are the decisions the system influences?",
        options: &[
            opt("informational", "Informational only", 10),
            opt("operational", "Routine operational decisions", 6),
            opt("individual", "Decisions about individuals", 2),
            opt("legal_effect", "Decisions with legal or similarly significant effect", 0),
        ],
    },
    IntakeQuestion {
        id: "human_oversight",
        prompt: "What level of human oversight is in place?",
        options: &[
            opt("human_in_loop", "A human approves every output", 10),
            opt("human_on_loop", "A human monitors and can intervene", 6),
            opt("periodic_review", "Periodic sampling review", 3),
            opt("fully_automated", "Fully automated", 0),
        ],
    },
    IntakeQuestion {
        id: "model_transparency",
        prompt: "How explainable is the model's behaviour?",
        options: &[
            opt("interpretable", "Inherently interpretable model", 10),
            opt("explained", "Black box with explanation tooling", 6),
            opt("documented", "Black box with vendor documentation only", 3),
            opt("opaque", "Opaque, no documentation", 0),
        ],
    },
    IntakeQuestion {
        id: "regulatory_exposure",
        prompt: "Which regulatory regimes apply to the use case?",
        options: &[
            opt("none", "No specific regulation", 10),
            opt("general", "General data protection only", 7),
            opt("sector", "Sector-specific regulation", 3),
            opt("high_risk_category", "Listed high-risk AI use case", 0),
        ],
    },
    IntakeQuestion {
        id: "vendor_dependency",
        prompt: "How is the model sourced?",
        options: &[
            opt("in_house", "Built and hosted in-house", 10),
            opt("open_weights", "Open-weights model hosted internally", 7),
            opt("managed_api", "Managed third-party API with DPA", 4),
            opt("unvetted", "Unvetted third-party service", 0),
        ],
    },
    IntakeQuestion {
        id: "data_quality",
        prompt: "How well governed is the training and input data?",
        options: &[
            opt("curated", "Curated with lineage and bias testing", 10),
            opt("documented", "Documented sources, no bias testing", 6),
            opt("ad_hoc", "Ad-hoc collection", 2),
            opt("unknown", "Unknown provenance", 0),
        ],
    },
    IntakeQuestion {
        id: "user_population",
        prompt: "Who interacts with the system's outputs?",
        options: &[
            opt("internal_team", "A small internal team", 10),
            opt("all_staff", "All staff", 7),
            opt("customers", "Customers", 3),
            opt("vulnerable", "Vulnerable groups or minors", 0),
        ],
    },
    IntakeQuestion {
        id: "reversibility",
        prompt: "How easily can an erroneous outcome be reversed?",
        options: &[
            opt("trivial", "Trivially reversible", 10),
            opt("manual", "Reversible with manual effort", 6),
            opt("costly", "Reversible only at significant cost", 3),
            opt("irreversible", "Irreversible", 0),
        ],
    },
    IntakeQuestion {
        id: "monitoring",
        prompt: "What production monitoring is planned?",
        options: &[
            opt("continuous", "Continuous drift and performance monitoring", 10),
            opt("scheduled", "Scheduled evaluations", 6),
            opt("incident_only", "Incident-driven only", 2),
            opt("none", "None", 0),
        ],
    },
];

/// Look up a question by id.
pub fn question(id: &str) -> Option<&'static IntakeQuestion> {
    QUESTION_BANK.iter().find(|q| q.id == id)
}

/// Best achievable raw sum across the bank.
pub fn max_possible_score() -> u32 {
    QUESTION_BANK.iter().map(IntakeQuestion::max_score).sum()
}

/// Risk-handling track assigned by the scorecard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPath {
    FastTrack,
    Standard,
    ElevatedReview,
    HighRisk,
}

impl RiskPath {
    /// Classify a normalized 0-100 score.
    pub fn from_score(score: u8) -> Self {
        if score >= FAST_TRACK_THRESHOLD {
            RiskPath::FastTrack
        } else if score >= STANDARD_THRESHOLD {
            RiskPath::Standard
        } else if score >= ELEVATED_REVIEW_THRESHOLD {
            RiskPath::ElevatedReview
        } else {
            RiskPath::HighRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskPath::FastTrack => "fast_track",
            RiskPath::Standard => "standard",
            RiskPath::ElevatedReview => "elevated_review",
            RiskPath::HighRisk => "high_risk",
        }
    }

    pub fn recommended_actions(&self) -> &'static [&'static str] {
        match self {
            RiskPath::FastTrack => &[
                "Proceed to build with standard engineering controls",
                "Register the system in the AI inventory",
                "Schedule a lightweight post-launch review",
            ],
            RiskPath::Standard => &[
                "Complete the standard risk assessment",
                "Assign a RACI matrix before the design gate",
                "Define monitoring metrics and owners",
            ],
            RiskPath::ElevatedReview => &[
                "Complete the full risk assessment with compliance sign-off",
                "Run bias and robustness testing before the build gate",
                "Document compensating controls for open findings",
                "Obtain executive sponsor approval",
            ],
            RiskPath::HighRisk => &[
                "Escalate to the AI governance board before further work",
                "Conduct a data protection impact assessment",
                "Engage legal review of regulatory obligations",
                "Require human-in-the-loop oversight for all outputs",
                "Request risk exceptions for any control gaps",
            ],
        }
    }
}

impl std::fmt::Display for RiskPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single submitted answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub question_id: String,
    pub selected_value: String,
    pub score: u32,
}

/// Outcome of scoring an intake submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeResult {
    pub total_score: u8,
    pub risk_path: RiskPath,
    pub recommended_actions: Vec<String>,
    pub project_id: String,
}

/// How each answered question's score is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScoreSource {
    /// Use the caller-supplied `score`.
    Submitted,
    /// Re-derive from `(question_id, selected_value)` against the bank.
    Bank,
}

/// Score an intake submission, trusting the submitted per-answer scores.
///
/// Submitted scores are clamped to the question's best option so the total
/// stays within 0-100. Unknown question ids are ignored; when a question is
/// answered more than once the first answer counts.
pub fn score_intake(project_id: &str, responses: &[IntakeResponse]) -> IntakeResult {
    score_with(project_id, responses, ScoreSource::Submitted)
}

/// Score an intake submission, re-deriving every score from the bank.
///
/// Values that match no option score 0.
pub fn score_intake_verified(project_id: &str, responses: &[IntakeResponse]) -> IntakeResult {
    score_with(project_id, responses, ScoreSource::Bank)
}

fn score_with(project_id: &str, responses: &[IntakeResponse], source: ScoreSource) -> IntakeResult {
    let raw: u32 = QUESTION_BANK
        .iter()
        .filter_map(|q| {
            let response = responses.iter().find(|r| r.question_id == q.id)?;
            let score = match source {
                ScoreSource::Submitted => response.score.min(q.max_score()),
                ScoreSource::Bank => q.option(&response.selected_value).map_or(0, |o| o.score),
            };
            Some(score)
        })
        .sum();

    let total_score = normalize(raw, max_possible_score());
    let risk_path = RiskPath::from_score(total_score);

    tracing::debug!(
        project_id,
        raw,
        total_score,
        risk_path = %risk_path,
        "Scored intake"
    );

    IntakeResult {
        total_score,
        risk_path,
        recommended_actions: risk_path
            .recommended_actions()
            .iter()
            .map(|a| a.to_string())
            .collect(),
        project_id: project_id.to_string(),
    }
}

/// `round(raw * 100 / max)`, half rounding up.
fn normalize(raw: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    let scaled = (u64::from(raw) * 100 + u64::from(max) / 2) / u64::from(max);
    scaled.min(100) as u8
}
