//! Action Parsing
//!
//! Turns raw model text into exactly one [`Action`]. The model is
//! instructed to emit a single JSON object per turn, but in practice
//! emits markdown fences, commentary, concatenated objects, or plain
//! prose. `parse` is total: every input yields an `Action`, with a
//! layered repair chain ordered cheapest-first and a wrap-the-raw-text
//! fallback that can never fail.

use serde::Deserialize;

use crate::completer::Completer;
use crate::history::Message;
use crate::tools::ToolArgs;

/// The single decoded instruction the model issues per turn.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Invoke one tool with JSON arguments
    ToolCall { name: String, args: ToolArgs },
    /// Terminate the turn with an answer for the user
    FinalAnswer { text: String },
}

/// Wire shape of a model decision: `{"action":"final","answer":...}`
/// or `{"action":"<tool>","args":{...}}`.
#[derive(Debug, Deserialize)]
struct Decision {
    action: String,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    args: ToolArgs,
}

impl From<Decision> for Action {
    fn from(decision: Decision) -> Self {
        if decision.action == "final" {
            Action::FinalAnswer {
                text: decision.answer.unwrap_or_default(),
            }
        } else {
            Action::ToolCall {
                name: decision.action,
                args: decision.args,
            }
        }
    }
}

/// System instruction for the model-assisted repair step.
const REPAIR_PROMPT: &str = "Convert the following text into ONLY this exact JSON format: \
{\"action\":\"final\",\"answer\":\"<text>\"} \
Return ONLY the JSON, nothing else.";

/// Total parser from raw model text to an [`Action`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionParser;

impl ActionParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw model output into an action.
    ///
    /// Fallback order, each step tried only if the previous yielded
    /// nothing: direct decode, plain-text heuristic, first-object
    /// extraction, model-assisted repair (one extra completion at
    /// temperature 0), and finally wrapping the raw text as a final
    /// answer. Never fails.
    pub async fn parse(&self, raw: &str, completer: &dyn Completer) -> Action {
        let text = raw.trim();

        // 1. The common case: one well-formed JSON object.
        if let Some(action) = decode(text) {
            return action;
        }

        // 2. Natural-language answer with no JSON structure at all.
        if !text.starts_with('{') && !text.contains("action") {
            return Action::FinalAnswer { text: text.into() };
        }

        // 3. Several objects concatenated (or an object plus trailing
        //    commentary containing braces): the first balanced span wins.
        if text.matches('{').count() > 1 {
            if let Some(action) = first_object(text).and_then(decode) {
                return action;
            }
        }

        // 4. Ask the model itself to reshape the text into the
        //    canonical final-answer object. Failure here is swallowed.
        tracing::debug!("falling back to model-assisted repair");
        let repair = [Message::system(REPAIR_PROMPT), Message::user(text)];
        if let Ok(fixed) = completer.complete(&repair, 0.0).await {
            if let Some(action) = decode(fixed.trim()) {
                return action;
            }
        }

        // 5. Last resort: never propagate a decode failure.
        Action::FinalAnswer { text: text.into() }
    }
}

/// Decode one whole JSON object in the decision shape.
fn decode(text: &str) -> Option<Action> {
    serde_json::from_str::<Decision>(text).ok().map(Action::from)
}

/// Balanced-brace scan: the shortest complete `{...}` span starting at
/// the first `{`.
fn first_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (i, b) in text.as_bytes().iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::{AgentError, Result};

    /// Completer stub that counts calls and replays a fixed response.
    struct StubCompleter {
        response: Result<String>,
        calls: AtomicUsize,
    }

    impl StubCompleter {
        fn returning(text: &str) -> Self {
            Self {
                response: Ok(text.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(AgentError::Completion("backend down".into())),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Completer for StubCompleter {
        async fn complete(&self, _messages: &[Message], _temperature: f32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(AgentError::Completion("backend down".into())),
            }
        }
    }

    #[tokio::test]
    async fn test_direct_decode_final_answer() {
        let stub = StubCompleter::failing();
        let action = ActionParser::new()
            .parse(r#"{"action":"final","answer":"All done."}"#, &stub)
            .await;

        assert_eq!(
            action,
            Action::FinalAnswer {
                text: "All done.".into()
            }
        );
        // The well-formed case must not touch the completer.
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_direct_decode_tool_call() {
        let stub = StubCompleter::failing();
        let action = ActionParser::new()
            .parse(
                r#"{"action":"book_recs","args":{"topic":"rust","limit":3}}"#,
                &stub,
            )
            .await;

        match action {
            Action::ToolCall { name, args } => {
                assert_eq!(name, "book_recs");
                assert_eq!(args["topic"], serde_json::json!("rust"));
                assert_eq!(args["limit"], serde_json::json!(3));
            }
            Action::FinalAnswer { .. } => panic!("expected tool call"),
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_tool_call_without_args_gets_empty_map() {
        let stub = StubCompleter::failing();
        let action = ActionParser::new()
            .parse(r#"{"action":"random_joke"}"#, &stub)
            .await;

        assert_eq!(
            action,
            Action::ToolCall {
                name: "random_joke".into(),
                args: ToolArgs::new()
            }
        );
    }

    #[tokio::test]
    async fn test_plain_text_wrapped_without_repair() {
        let stub = StubCompleter::failing();
        let action = ActionParser::new()
            .parse("Hello, here is your answer.", &stub)
            .await;

        assert_eq!(
            action,
            Action::FinalAnswer {
                text: "Hello, here is your answer.".into()
            }
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_first_balanced_object_wins() {
        let stub = StubCompleter::failing();
        let action = ActionParser::new()
            .parse(
                r#"{"action":"final","answer":"A"}{"action":"final","answer":"B"}"#,
                &stub,
            )
            .await;

        assert_eq!(action, Action::FinalAnswer { text: "A".into() });
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_nested_args_survive_extraction() {
        let stub = StubCompleter::failing();
        let raw = r#"{"action":"plan","args":{"steps":{"first":{"tool":"x"}}}} and then more"#;
        // Trailing commentary has no brace, so the brace count is driven
        // by the nested object alone.
        let action = ActionParser::new().parse(raw, &stub).await;

        match action {
            Action::ToolCall { name, args } => {
                assert_eq!(name, "plan");
                assert_eq!(args["steps"]["first"]["tool"], serde_json::json!("x"));
            }
            Action::FinalAnswer { .. } => panic!("expected tool call"),
        }
    }

    #[tokio::test]
    async fn test_repair_call_recovers_canonical_shape() {
        let stub = StubCompleter::returning(r#"{"action":"final","answer":"repaired"}"#);
        // Starts with a brace but never closes it, and mentions the
        // action token, so steps 1-3 all miss.
        let action = ActionParser::new()
            .parse(r#"{"action":"final","answer":"oops"#, &stub)
            .await;

        assert_eq!(
            action,
            Action::FinalAnswer {
                text: "repaired".into()
            }
        );
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_last_resort_wraps_raw_text() {
        let stub = StubCompleter::failing();
        let raw = r#"{"action": broken json"#;
        let action = ActionParser::new().parse(raw, &stub).await;

        assert_eq!(action, Action::FinalAnswer { text: raw.into() });
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_totality_over_hostile_inputs() {
        let stub = StubCompleter::failing();
        let parser = ActionParser::new();
        let inputs = [
            "",
            "   ",
            "{",
            "}}}}",
            "{{{{",
            "action",
            "{\"action\":}",
            "not json at all, but mentions action anyway {",
            "\u{1F980} unicode crab",
        ];

        for input in inputs {
            // Must produce some action for every input, never panic.
            let _ = parser.parse(input, &stub).await;
        }
    }

    #[tokio::test]
    async fn test_empty_input_becomes_empty_final_answer() {
        let stub = StubCompleter::failing();
        let action = ActionParser::new().parse("", &stub).await;
        assert_eq!(action, Action::FinalAnswer { text: String::new() });
    }
}
