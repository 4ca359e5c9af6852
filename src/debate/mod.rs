//! Boardroom debate orchestration
//!
//! Three dependent generation calls run as a strict linear pipeline:
//! Realist critique, Visionary defense, Analyst verdict. Each stage's
//! prompt embeds the previous stage's full output verbatim. A failure at
//! any stage aborts the whole debate; callers never see partial stages.

use serde::{Deserialize, Serialize};
use tera::Context;

use crate::error::ApiError;
use crate::llm::{generate_with_retry, RetryPolicy, TextCompletion};
use crate::prompts::{self, PromptEngine};

/// One stage of the debate pipeline
struct DebateStage {
    name: &'static str,
    template: &'static str,
}

/// Pipeline order is the contract: each stage feeds the next
const STAGES: [DebateStage; 3] = [
    DebateStage {
        name: "Realist",
        template: prompts::DEBATE_REALIST,
    },
    DebateStage {
        name: "Visionary",
        template: prompts::DEBATE_VISIONARY,
    },
    DebateStage {
        name: "Analyst",
        template: prompts::DEBATE_ANALYST,
    },
];

/// Complete debate output; every field produced exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateArtifact {
    pub critique: String,
    pub defense: String,
    pub verdict: String,
    pub composite: String,
}

/// Run the full three-stage debate for an idea against its market context
pub async fn run_debate<C: TextCompletion>(
    llm: &C,
    policy: &RetryPolicy,
    prompts: &PromptEngine,
    idea: &str,
    market_context: &str,
) -> Result<DebateArtifact, ApiError> {
    let mut outputs: Vec<String> = Vec::with_capacity(STAGES.len());

    for stage in &STAGES {
        log::info!("Debate stage: {}", stage.name);

        let mut context = Context::new();
        context.insert("idea", idea);
        context.insert("context", market_context);
        if let Some(critique) = outputs.first() {
            context.insert("critique", critique);
        }
        if let Some(defense) = outputs.get(1) {
            context.insert("defense", defense);
        }

        let prompt = prompts.render(stage.template, &context)?;
        let output = generate_with_retry(llm, policy, &prompt)
            .await
            .map_err(ApiError::Completion)?;
        outputs.push(output);
    }

    let critique = outputs[0].clone();
    let defense = outputs[1].clone();
    let verdict = outputs[2].clone();
    let composite = compose_minutes(&critique, &defense, &verdict);

    Ok(DebateArtifact {
        critique,
        defense,
        verdict,
        composite,
    })
}

/// Aggregate the three stage outputs into the "boardroom minutes" markdown
fn compose_minutes(critique: &str, defense: &str, verdict: &str) -> String {
    format!(
        "## Boardroom Debate: The Verdict\n\n\
         ### The Realist's Critique\n{}\n\n\
         ---\n\
         ### The Visionary's Defense\n{}\n\n\
         ---\n\
         ### Final Analyst Summary\n{}\n",
        critique, defense, verdict
    )
}
