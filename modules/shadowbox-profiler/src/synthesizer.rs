//! Persona synthesis from an aggregated corpus.
//!
//! Synthesis is infallible at the trait boundary: an implementation that
//! cannot produce a real persona returns the generic fallback, so the
//! pipeline always ends with a usable persona for every entity.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use shadowbox_common::Persona;
use tracing::{info, warn};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, corpus: &str, display_name: &str) -> Persona;
}

/// Persona synthesis via OpenRouter's chat completions API.
pub struct OpenRouterSynthesizer {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenRouterSynthesizer {
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.to_string(),
        }
    }

    async fn request_persona(&self, corpus: &str, display_name: &str) -> Result<Persona> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("no OpenRouter API key configured"))?;

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a psychological profiler. Output valid JSON only."
                },
                {"role": "user", "content": build_prompt(corpus, display_name)},
            ],
            "response_format": {"type": "json_object"},
        });

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            bail!("OpenRouter returned {status}: {message}");
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("response contained no choices"))?;

        parse_persona(&content, display_name)
    }
}

#[async_trait]
impl Synthesizer for OpenRouterSynthesizer {
    async fn synthesize(&self, corpus: &str, display_name: &str) -> Persona {
        info!(
            name = display_name,
            model = %self.model,
            corpus_chars = corpus.len(),
            "Synthesizing persona"
        );
        match self.request_persona(corpus, display_name).await {
            Ok(persona) => persona,
            Err(err) => {
                warn!(
                    name = display_name,
                    error = %err,
                    "Persona synthesis failed, using fallback"
                );
                Persona::fallback(display_name)
            }
        }
    }
}

fn build_prompt(corpus: &str, display_name: &str) -> String {
    format!(
        r#"You are an expert psychological profiler and comedy writer.
Analyze the following social media data for {display_name} and create a "Digital Twin" persona for a roast battle game.

SOCIAL MEDIA DATA:
{corpus}

INSTRUCTIONS:
1. Identify their SPEECH PATTERNS: vocabulary, sentence structure, tone. Be very specific.
2. Find PSYCHOLOGICAL INSECURITIES: things they're defensive about, contradictions, failures.
3. Understand their WORLDVIEW: what they believe, and where those beliefs contradict their actions.
4. List specific ATTACK VECTORS: embarrassing moments, hypocrisies, meme-able quotes.
5. Deduce their GENDER: "male", "female", or "non-binary".
6. **CRITICAL**: Generate a "system_prompt" that is EXTREMELY DETAILED.
   - It must contain a "Knowledge Base" of specific facts, quotes, and events from the data.
   - Include at least 15 specific data points (tweets, posts, bio details) in the Knowledge Base.
   - It must explicitly define their writing style with examples.
   - It must be long enough to give the sparring LLM deep context (at least 500 words).
   - The system prompt must explicitly instruct the persona to NOT use emojis.

Return JSON format ONLY:
{{
    "name": "Their real name only (e.g. 'John Smith'). NO brackets, labels, or descriptions.",
    "speech_patterns": {{
        "vocabulary": ["word1", "word2", "phrase1"],
        "sentence_structure": "description of how they write",
        "tone": "description of their tone"
    }},
    "psychological_insecurities": ["insecurity 1 with specific example"],
    "worldview": {{
        "core_beliefs": ["belief 1"],
        "contradictions": ["contradiction 1"]
    }},
    "attack_vectors": ["specific embarrassing fact or event 1"],
    "gender": "male/female/non-binary",
    "system_prompt": "You are [name]...\n\nKNOWLEDGE BASE (Use these facts!):\n- [Fact 1]\n..."
}}"#
    )
}

/// Parse the model's reply into a persona. Tolerates code-fenced output and
/// a persona wrapped in a one-element list; fills gaps the model left.
fn parse_persona(content: &str, display_name: &str) -> Result<Persona> {
    let cleaned = strip_code_fences(content);
    let mut value: serde_json::Value = serde_json::from_str(cleaned)?;
    if let serde_json::Value::Array(items) = value {
        value = items
            .into_iter()
            .find(|v| v.is_object())
            .ok_or_else(|| anyhow!("model returned an empty or invalid list"))?;
    }

    let mut persona: Persona = serde_json::from_value(value)?;
    if persona.name.trim().is_empty() {
        persona.name = display_name.to_string();
    }
    if persona.gender.trim().is_empty() {
        persona.gender = "unknown".to_string();
    }
    if persona.system_prompt.trim().is_empty() {
        persona.system_prompt = format!("You are {display_name}.");
    }
    Ok(persona)
}

fn strip_code_fences(content: &str) -> &str {
    let content = content.trim();
    if let Some((_, rest)) = content.split_once("```json") {
        return match rest.split_once("```") {
            Some((inner, _)) => inner.trim(),
            None => rest.trim(),
        };
    }
    if let Some((_, rest)) = content.split_once("```") {
        return match rest.split_once("```") {
            Some((inner, _)) => inner.trim(),
            None => rest.trim(),
        };
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_code_fences() {
        let fenced = "```json\n{\"name\": \"x\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"name\": \"x\"}");

        let bare = "```\n{\"name\": \"x\"}\n```";
        assert_eq!(strip_code_fences(bare), "{\"name\": \"x\"}");

        let plain = "{\"name\": \"x\"}";
        assert_eq!(strip_code_fences(plain), plain);
    }

    #[test]
    fn unwraps_single_element_lists() {
        let content = r#"[{"name": "Jane", "system_prompt": "You are Jane."}]"#;
        let persona = parse_persona(content, "fallback").unwrap();
        assert_eq!(persona.name, "Jane");
    }

    #[test]
    fn fills_missing_fields_from_display_name() {
        let persona = parse_persona("{}", "@elonmusk").unwrap();
        assert_eq!(persona.name, "@elonmusk");
        assert_eq!(persona.gender, "unknown");
        assert_eq!(persona.system_prompt, "You are @elonmusk.");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_persona("not json", "x").is_err());
        assert!(parse_persona("[]", "x").is_err());
    }
}
