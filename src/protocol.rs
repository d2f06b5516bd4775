//! JSON bodies exchanged with the relay

use crate::battle::catalog::{RapperPair, SuggestionPool};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/convert`.
///
/// Both fields are optional so that missing or mistyped values are reported
/// through the relay's own validation errors rather than a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
}

impl ConvertBody {
    /// Read the body without ever failing. Unparseable JSON counts as empty
    /// and fields that are not strings count as missing.
    pub fn parse_lenient(raw: &[u8]) -> Self {
        let value: serde_json::Value = serde_json::from_slice(raw).unwrap_or_default();
        let field = |name: &str| value.get(name).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            text: field("text"),
            voice_id: field("voiceId"),
        }
    }
}

/// Error payload for every non-2xx relay response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    /// Machine-readable class, e.g. `invalid_text`
    #[serde(default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
}

impl From<Voice> for VoiceInfo {
    fn from(voice: Voice) -> Self {
        Self {
            id: voice.id().to_string(),
            name: voice.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
    pub default_left: String,
    pub default_right: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub pair: RapperPair,
    pub suggestions: SuggestionPool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}
