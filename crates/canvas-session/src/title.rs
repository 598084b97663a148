//! Chat title generation with a fixed fallback
//!
//! Generation is an external collaborator. Its failure must never block the
//! chat, so every path ends in a usable title.

use async_trait::async_trait;
use canvas_artifact::ChatMessage;

use crate::config::TitleConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("title generation failed: {0}")]
pub struct TitleError(pub String);

/// Summarizes a chat's first user message into a short title
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    async fn generate(&self, message: &ChatMessage) -> Result<String, TitleError>;
}

/// Strip quotes and colons, collapse whitespace and cap the length
///
/// Returns `None` if nothing printable is left.
#[must_use]
pub fn sanitize_title(raw: &str, max_chars: usize) -> Option<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | ':' | '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}'))
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(max_chars).collect();
    let title = capped.trim_end();
    (!title.is_empty()).then(|| title.to_string())
}

/// Generate a title, falling back to the configured placeholder
pub async fn title_or_fallback(generator: &dyn TitleGenerator, message: &ChatMessage, config: &TitleConfig) -> String {
    match generator.generate(message).await {
        Ok(raw) => sanitize_title(&raw, config.max_chars).unwrap_or_else(|| {
            tracing::debug!("generated title was empty, using fallback");
            config.fallback.clone()
        }),
        Err(err) => {
            tracing::warn!(error = %err, "failed to generate title");
            config.fallback.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn strips_quotes_and_colons() {
        assert_eq!(
            sanitize_title("\"Rust: ownership basics\"", 80).as_deref(),
            Some("Rust ownership basics")
        );
    }

    #[test]
    fn caps_length_in_chars() {
        let title = sanitize_title(&"é".repeat(100), 80).unwrap();
        assert_eq!(title.chars().count(), 80);
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(sanitize_title(" \"\" : ", 80), None);
    }

    proptest! {
        #[test]
        fn sanitized_titles_are_clean(raw in "\\PC{0,200}", max in 1usize..100) {
            if let Some(title) = sanitize_title(&raw, max) {
                prop_assert!(title.chars().count() <= max);
                prop_assert!(!title.contains(['"', ':']));
                prop_assert_eq!(title.trim(), title.as_str());
            }
        }
    }

    #[tokio::test]
    async fn failure_uses_fallback() {
        let mut generator = MockTitleGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(TitleError("model unavailable".to_string())));

        let title = title_or_fallback(&generator, &ChatMessage::user_text("hi"), &TitleConfig::default()).await;
        assert_eq!(title, "New Chat");
    }

    #[tokio::test]
    async fn empty_output_uses_fallback() {
        let mut generator = MockTitleGenerator::new();
        generator.expect_generate().returning(|_| Ok("  ".to_string()));

        let config = TitleConfig {
            fallback: "Untitled".to_string(),
            max_chars: 80,
        };
        let title = title_or_fallback(&generator, &ChatMessage::user_text("hi"), &config).await;
        assert_eq!(title, "Untitled");
    }

    #[tokio::test]
    async fn success_is_sanitized() {
        let mut generator = MockTitleGenerator::new();
        generator
            .expect_generate()
            .withf(|message| message.text() == "how do lifetimes work")
            .returning(|_| Ok("Lifetimes: explained".to_string()));

        let title = title_or_fallback(
            &generator,
            &ChatMessage::user_text("how do lifetimes work"),
            &TitleConfig::default(),
        )
        .await;
        assert_eq!(title, "Lifetimes explained");
    }
}
