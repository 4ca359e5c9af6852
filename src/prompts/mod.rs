//! Prompt templates for every generation workflow
//!
//! Built-in templates are string constants registered into a tera engine
//! at startup. Handlers render by name with a context of named values;
//! unknown variables fail the render rather than producing a silently
//! broken prompt.

mod builtin;

pub use builtin::{
    DEBATE_ANALYST, DEBATE_REALIST, DEBATE_VISIONARY, FINANCIAL_ASSUMPTIONS, IDEA_GENERATION,
    IDEA_REGENERATION, IDEA_VALIDATION, MARKET_RESEARCH_FALLBACK, PROTOTYPE_UI, RAG_ANSWER,
    UNICORN_PREDICTION,
};

use anyhow::{Context as _, Result};
use tera::{Context, Tera};

/// Template engine with all built-in prompts registered
pub struct PromptEngine {
    tera: Tera,
}

impl PromptEngine {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        for (name, content) in builtin::builtin_templates() {
            tera.add_raw_template(name, content)
                .with_context(|| format!("Failed to register template '{}'", name))?;
        }
        Ok(Self { tera })
    }

    /// Render a template by name with the given context
    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(name, context)
            .with_context(|| format!("Failed to render template '{}'", name))
    }

    /// Render a single-variable query template (the fallback research path)
    pub fn render_query(&self, name: &str, query: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("query", query);
        self.render(name, &context)
    }

    /// Render an idea-centric template with market context attached
    pub fn render_idea(&self, name: &str, idea: &str, market_context: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("idea", idea);
        context.insert("context", market_context);
        self.render(name, &context)
    }
}
