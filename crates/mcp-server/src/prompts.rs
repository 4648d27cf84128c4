//! MCP prompt templates
//!
//! Each prompt turns a few arguments into a user message that steers the
//! assistant toward the matching discovery tools.

use std::collections::HashMap;

use crate::protocol::{GetPromptResult, JsonRpcError, Prompt, PromptArgument, PromptMessage, ToolContent};

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

/// List available prompts
pub fn list_prompts() -> Vec<Prompt> {
    vec![
        Prompt {
            name: "movie_night".to_string(),
            description: "Plan a movie night around a mood and time of day".to_string(),
            arguments: Some(vec![
                argument("mood", "cozy, energetic, thoughtful or comfort", true),
                argument("time_context", "morning, late_night or weekend", false),
            ]),
        },
        Prompt {
            name: "compare_critics_and_audience".to_string(),
            description: "Explain where critics and audiences disagree about a title".to_string(),
            arguments: Some(vec![argument("title", "Movie title to look up", true)]),
        },
        Prompt {
            name: "similar_but_different".to_string(),
            description: "Find titles like a reference with a twist".to_string(),
            arguments: Some(vec![
                argument("reference_title", "Movie to start from", true),
                argument(
                    "modifier",
                    "accessible, grounded, cerebral, crowd_pleasing or challenging",
                    true,
                ),
            ]),
        },
    ]
}

fn required<'a>(arguments: &'a HashMap<String, String>, name: &str) -> Result<&'a str, JsonRpcError> {
    arguments
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Missing required argument: {}", name)))
}

/// Render a prompt with its arguments
pub fn get_prompt(
    name: &str,
    arguments: &HashMap<String, String>,
) -> Result<GetPromptResult, JsonRpcError> {
    let (description, text) = match name {
        "movie_night" => {
            let mood = required(arguments, "mood")?;
            let text = match arguments.get("time_context").map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(time) => format!(
                    "I'm in a {} mood and it's {}. Use find_by_mood with mood \"{}\" and time_context \"{}\", \
                     then pick three titles and explain why each fits.",
                    mood, time, mood, time
                ),
                None => format!(
                    "I'm in a {} mood. Use find_by_mood with mood \"{}\", then pick three titles \
                     and explain why each fits.",
                    mood, mood
                ),
            };
            ("Movie night recommendations", text)
        }
        "compare_critics_and_audience" => {
            let title = required(arguments, "title")?;
            let text = format!(
                "Search for \"{}\" with search_titles, fetch it with get_enriched_details, and explain \
                 how critics and audiences rated it. Call out the rating analysis and what the gap \
                 says about who will enjoy it.",
                title
            );
            ("Critic versus audience breakdown", text)
        }
        "similar_but_different" => {
            let reference = required(arguments, "reference_title")?;
            let modifier = required(arguments, "modifier")?;
            let text = format!(
                "Find movies like \"{}\" but {} using find_by_vibe_modifier, then describe how each \
                 result keeps the feel of the original.",
                reference,
                modifier.replace('_', " ")
            );
            ("Vibe-shifted recommendations", text)
        }
        _ => {
            return Err(JsonRpcError::invalid_params(format!("Unknown prompt: {}", name)));
        }
    };

    Ok(GetPromptResult {
        description: description.to_string(),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: ToolContent::Text { text },
        }],
    })
}
