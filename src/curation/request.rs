use serde::{Deserialize, Serialize};

use crate::collaborator::prompts::SYSTEM_RANKING;
use crate::collaborator::ModelTier;
use crate::types::{QuestionKind, QuestionMap};

/// One candidate as the ranker sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCandidate {
    pub slide: u32,
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "text")]
    pub display_text: String,
}

/// Flatten candidates in slide order, then index order.
pub fn flatten(candidates: &QuestionMap) -> Vec<FlatCandidate> {
    candidates
        .iter()
        .flat_map(|(&slide, questions)| {
            questions.iter().enumerate().map(move |(index, q)| FlatCandidate {
                slide,
                index,
                kind: q.kind(),
                display_text: q.display_text().to_string(),
            })
        })
        .collect()
}

/// Targets handed to the ranker. The ranker enforces them loosely; nothing
/// here clamps its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionPolicy {
    pub target_min: usize,
    pub target_max: usize,
    /// Minimum share of open-ended or short-answer items.
    pub min_core_share: f64,
    /// Minimum share of the other kinds.
    pub min_variety_share: f64,
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self {
            target_min: 15,
            target_max: 20,
            min_core_share: 0.5,
            min_variety_share: 0.25,
        }
    }
}

/// The JSON payload of a ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPayload {
    pub candidates: Vec<FlatCandidate>,
    pub total_slide_count: usize,
    pub policy: InclusionPolicy,
}

#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub payload: RankingPayload,
    pub system: &'static str,
    pub instruction: String,
    pub tier: ModelTier,
    pub max_tokens: u32,
}

impl RankingRequest {
    pub fn build(
        candidates: &QuestionMap,
        total_slide_count: usize,
        policy: &InclusionPolicy,
    ) -> Result<Self, serde_json::Error> {
        let payload = RankingPayload {
            candidates: flatten(candidates),
            total_slide_count,
            policy: policy.clone(),
        };
        let instruction = ranking_instruction(&payload)?;

        Ok(Self {
            payload,
            system: SYSTEM_RANKING,
            instruction,
            tier: ModelTier::Advanced,
            max_tokens: 2000,
        })
    }
}

fn percent(share: f64) -> u32 {
    (share * 100.0).round() as u32
}

fn ranking_instruction(payload: &RankingPayload) -> Result<String, serde_json::Error> {
    let listing = serde_json::to_string_pretty(&payload.candidates)?;
    let policy = &payload.policy;
    let core: Vec<&str> = QuestionKind::ALL
        .iter()
        .filter(|k| k.is_core())
        .map(QuestionKind::as_str)
        .collect();

    Ok(format!(
        r#"The deck has {total} slides. Not every slide needs a question. Choose the best questions:
they should cover the most important concepts, mix question types, be clear, and help
students engage with the material.

Requirements:
- At least {core_pct}% of the chosen questions must be of type {core}.
- At least {variety_pct}% must be of other types.
- Choose roughly {min}-{max} questions in total.

Candidates:
{listing}

Reply with ONLY JSON listing the questions to include:
{{"selected": [{{"slide": 4, "index": 0}}, {{"slide": 5, "index": 1}}]}}"#,
        total = payload.total_slide_count,
        core_pct = percent(policy.min_core_share),
        core = core.join(" or "),
        variety_pct = percent(policy.min_variety_share),
        min = policy.target_min,
        max = policy.target_max,
    ))
}
