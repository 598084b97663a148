//! Chat model catalog

use indexmap::IndexMap;
use serde::Serialize;

pub const DEFAULT_CHAT_MODEL: &str = "anthropic/claude-opus-4.6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatModel {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
}

static CHAT_MODELS: [ChatModel; 1] = [ChatModel {
    id: DEFAULT_CHAT_MODEL,
    name: "Claude Opus 4.6",
    provider: "anthropic",
    description: "Your exclusive custom model.",
}];

/// Every selectable model
#[must_use]
pub fn chat_models() -> &'static [ChatModel] {
    &CHAT_MODELS
}

/// Models grouped by provider, in catalog order
#[must_use]
pub fn models_by_provider() -> IndexMap<&'static str, Vec<&'static ChatModel>> {
    let mut grouped: IndexMap<&'static str, Vec<&'static ChatModel>> = IndexMap::new();
    for model in chat_models() {
        grouped.entry(model.provider).or_default().push(model);
    }
    grouped
}

#[must_use]
pub fn find_model(id: &str) -> Option<&'static ChatModel> {
    chat_models().iter().find(|model| model.id == id)
}

/// Resolve a configured model id, falling back to the default
#[must_use]
pub fn resolve_model(id: &str) -> &'static ChatModel {
    find_model(id).unwrap_or_else(|| {
        tracing::warn!(model = id, fallback = DEFAULT_CHAT_MODEL, "unknown chat model");
        &CHAT_MODELS[0]
    })
}
