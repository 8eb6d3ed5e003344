use serde::{Deserialize, Serialize};

/// How the person talks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechStyle {
    /// Common words and phrases they use.
    #[serde(default)]
    pub vocabulary: Vec<String>,
    /// e.g. "short, punchy" or "long, formal".
    #[serde(default)]
    pub sentence_structure: String,
    /// e.g. "sarcastic, dismissive".
    #[serde(default)]
    pub tone: String,
}

/// What the person believes, and where those beliefs crack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Worldview {
    #[serde(default)]
    pub core_beliefs: Vec<String>,
    /// Inconsistencies between stated beliefs and behavior.
    #[serde(default)]
    pub contradictions: Vec<String>,
}

/// Structured persona synthesized from a person's aggregated social corpus.
/// The `system_prompt` is the ready-to-use sparring prompt; the other fields
/// exist so callers can surface or score individual traits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "speech_patterns")]
    pub speech_style: SpeechStyle,
    /// Weak points: things they are defensive about.
    #[serde(default, alias = "psychological_insecurities")]
    pub insecurities: Vec<String>,
    #[serde(default)]
    pub worldview: Worldview,
    /// Specific embarrassing facts and events, quotable verbatim.
    #[serde(default, alias = "attack_vectors")]
    pub attack_facts: Vec<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub system_prompt: String,
}

impl Persona {
    /// Generic persona used when synthesis fails or no data was available.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            speech_style: SpeechStyle {
                vocabulary: vec!["generic".to_string()],
                sentence_structure: "standard".to_string(),
                tone: "neutral".to_string(),
            },
            insecurities: vec!["Unknown weaknesses".to_string()],
            worldview: Worldview {
                core_beliefs: vec!["Unknown beliefs".to_string()],
                contradictions: vec!["Unknown contradictions".to_string()],
            },
            attack_facts: vec!["No specific attack vectors found".to_string()],
            gender: "unknown".to_string(),
            system_prompt: format!("You are {name}. You are a generic sparring persona."),
        }
    }
}
