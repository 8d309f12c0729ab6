//! Prompt Construction
//!
//! The session's system message: fixed protocol instructions plus the
//! rendered tool listing. Built once per session, not per turn.

use crate::catalog::ToolCatalog;

/// Protocol instructions: one JSON action per model turn.
pub const PROTOCOL_PROMPT: &str = r#"You are a helpful assistant with access to external tools.

CRITICAL RULES:
1. Return ONLY ONE valid JSON object per response
2. Never return multiple JSON objects
3. Never add explanations or markdown
4. Just pure JSON

WORKFLOW:
- User asks a question
- You return ONE JSON action (tool call OR final answer)
- If you called a tool, you'll see its result
- Then you decide next action (another tool OR final answer)
- Repeat until you have all info, then give final answer

JSON FORMATS (use exactly one):
Tool call: {"action":"tool_name","args":{"param":"value"}}
Final answer: {"action":"final","answer":"your response"}

Remember: ONE JSON object only. No explanations."#;

/// The full system prompt for a session with the given catalog.
pub fn system_prompt(catalog: &ToolCatalog) -> String {
    format!(
        "{PROTOCOL_PROMPT}\n\nAvailable tools:\n{}",
        catalog.describe()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ToolCatalog, ToolDescriptor};

    #[test]
    fn test_system_prompt_embeds_tool_listing() {
        let catalog = ToolCatalog::build(vec![ToolDescriptor {
            name: "random_joke".into(),
            description: "Tell a joke".into(),
            parameters: vec![],
        }])
        .unwrap();

        let prompt = system_prompt(&catalog);
        assert!(prompt.starts_with(PROTOCOL_PROMPT));
        assert!(prompt.contains("Available tools:\n- random_joke: Tell a joke"));
    }
}
