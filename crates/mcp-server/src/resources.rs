//! MCP Resource implementations
//!
//! Read-only JSON views of the discovery rule tables and the canonical genre
//! table, so assistants can see which keys each tool accepts.

use cinevibe_discovery::{fallback_rule, Mood, Personality, RuleKey, TimeContext, VibeModifier};
use cinevibe_ingestion::CanonicalGenre;
use serde_json::{json, Value};
use tracing::instrument;

use crate::protocol::{
    error_codes, JsonRpcError, Resource, ResourceContent, ResourceReadResult,
};

const JSON_MIME: &str = "application/json";

pub const VIBE_MODIFIERS_URI: &str = "cinevibe://rules/vibe-modifiers";
pub const MOODS_URI: &str = "cinevibe://rules/moods";
pub const TIME_CONTEXTS_URI: &str = "cinevibe://rules/time-contexts";
pub const PERSONALITIES_URI: &str = "cinevibe://rules/personalities";
pub const FALLBACK_URI: &str = "cinevibe://rules/fallback";
pub const GENRES_URI: &str = "cinevibe://genres";

/// Resource manager
pub struct ResourceManager;

impl ResourceManager {
    /// List available resources
    pub fn list_resources() -> Vec<Resource> {
        [
            (VIBE_MODIFIERS_URI, "Vibe Modifiers", "Modifiers accepted by find_by_vibe_modifier and the rules behind them"),
            (MOODS_URI, "Moods", "Moods accepted by find_by_mood and the rules behind them"),
            (TIME_CONTEXTS_URI, "Time Contexts", "Time-of-day overlays accepted by find_by_mood"),
            (PERSONALITIES_URI, "Personalities", "Critic/audience archetypes accepted by find_by_personality"),
            (FALLBACK_URI, "Fallback Rule", "Rule used when a key is not recognized"),
            (GENRES_URI, "Genres", "Canonical genre names with their TMDb ids"),
        ]
        .into_iter()
        .map(|(uri, name, description)| Resource {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: Some(JSON_MIME.to_string()),
        })
        .collect()
    }

    /// Read a resource by URI
    #[instrument]
    pub fn read_resource(uri: &str) -> Result<ResourceReadResult, JsonRpcError> {
        let body = match uri {
            VIBE_MODIFIERS_URI => rule_table::<VibeModifier>(),
            MOODS_URI => rule_table::<Mood>(),
            TIME_CONTEXTS_URI => rule_table::<TimeContext>(),
            PERSONALITIES_URI => rule_table::<Personality>(),
            FALLBACK_URI => json!({ "rule": fallback_rule() }),
            GENRES_URI => genre_table(),
            _ => {
                return Err(JsonRpcError::new(
                    error_codes::RESOURCE_NOT_FOUND,
                    format!("Resource not found: {}", uri),
                )
                .with_data(json!({ "uri": uri })));
            }
        };

        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| JsonRpcError::internal_error(e.to_string()))?;

        Ok(ResourceReadResult {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                mime_type: Some(JSON_MIME.to_string()),
                text,
            }],
        })
    }
}

fn rule_table<K: RuleKey>() -> Value {
    let entries: Vec<Value> = K::ALL
        .iter()
        .map(|k| {
            json!({
                "key": k.key(),
                "description": k.description(),
                "rule": k.rule(),
            })
        })
        .collect();

    json!({ "kind": K::KIND, "entries": entries })
}

fn genre_table() -> Value {
    let genres: Vec<Value> = CanonicalGenre::ALL
        .iter()
        .map(|g| json!({ "name": g.as_str(), "tmdb_id": g.tmdb_id() }))
        .collect();
    json!({ "genres": genres })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_json(uri: &str) -> Value {
        let result = ResourceManager::read_resource(uri).unwrap();
        assert_eq!(result.contents.len(), 1);
        serde_json::from_str(&result.contents[0].text).unwrap()
    }

    #[test]
    fn test_every_listed_resource_is_readable() {
        for resource in ResourceManager::list_resources() {
            let result = ResourceManager::read_resource(&resource.uri).unwrap();
            assert_eq!(result.contents[0].uri, resource.uri);
        }
    }

    #[test]
    fn test_mood_table() {
        let body = read_json(MOODS_URI);
        assert_eq!(body["kind"], "mood");
        let keys: Vec<&str> = body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["cozy", "energetic", "thoughtful", "comfort"]);
    }

    #[test]
    fn test_genre_table() {
        let body = read_json(GENRES_URI);
        let genres = body["genres"].as_array().unwrap();
        assert_eq!(genres.len(), CanonicalGenre::ALL.len());
        assert!(genres
            .iter()
            .any(|g| g["name"] == "Science Fiction" && g["tmdb_id"] == 878));
    }

    #[test]
    fn test_unknown_resource() {
        let err = ResourceManager::read_resource("cinevibe://rules/unknown").unwrap_err();
        assert_eq!(err.code, error_codes::RESOURCE_NOT_FOUND);
    }
}
