use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldIssue;

pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const TEXT_MAX_CHARS: usize = 1000;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Text,
    Image,
    Video,
    Code,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Text => "text",
            Category::Image => "image",
            Category::Video => "video",
            Category::Code => "code",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

// Form submitted by the browser
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PromptForm {
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
    pub length: Length,
}

const FORM_FIELDS: [&str; 4] = ["category", "description", "details", "length"];

fn field_is_well_typed(field: &str, value: Option<&Value>) -> bool {
    match (field, value) {
        ("details", None | Some(Value::Null)) => true,
        (_, None) => false,
        ("category", Some(v)) => Category::deserialize(v).is_ok(),
        ("length", Some(v)) => Length::deserialize(v).is_ok(),
        (_, Some(v)) => v.is_string(),
    }
}

impl PromptForm {
    /// Decodes a parsed JSON body, naming the first offending field on failure.
    pub fn from_json(value: &Value) -> Result<Self, Vec<FieldIssue>> {
        Self::deserialize(value).map_err(|e| {
            let field = value
                .as_object()
                .and_then(|obj| {
                    FORM_FIELDS
                        .into_iter()
                        .find(|f| !field_is_well_typed(f, obj.get(*f)))
                })
                .unwrap_or("body");
            vec![FieldIssue::new(field, e.to_string())]
        })
    }

    /// Checks the free-text fields; enum fields are already enforced by serde.
    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let description = self.description.chars().count();
        if description < DESCRIPTION_MIN_CHARS {
            issues.push(FieldIssue::new(
                "description",
                format!("Description must be at least {DESCRIPTION_MIN_CHARS} characters"),
            ));
        } else if description > TEXT_MAX_CHARS {
            issues.push(FieldIssue::new(
                "description",
                format!("Description must be at most {TEXT_MAX_CHARS} characters"),
            ));
        }

        if let Some(details) = &self.details {
            if details.chars().count() > TEXT_MAX_CHARS {
                issues.push(FieldIssue::new(
                    "details",
                    format!("Details must be at most {TEXT_MAX_CHARS} characters"),
                ));
            }
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }

    // Empty details are treated as absent
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

// Response sent back to the browser
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_prompt: String,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

// Inference API request format
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct InferenceRequest {
    pub messages: Vec<ChatMessage>,
}

// Inference API response format, only the fields we read
#[derive(Deserialize, Debug)]
pub struct InferenceResponse {
    pub result: Option<InferenceResult>,
    #[serde(default)]
    pub success: bool,
}

#[derive(Deserialize, Debug)]
pub struct InferenceResult {
    pub response: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct AnalyticsEvent {
    pub name: Option<String>,
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

// Absent fields are left out of the capture payload rather than sent as null
#[derive(Serialize, Debug)]
pub struct CaptureRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<&'a serde_json::Map<String, serde_json::Value>>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(description: &str, details: Option<&str>) -> PromptForm {
        PromptForm {
            category: Category::Code,
            description: description.to_string(),
            details: details.map(str::to_string),
            length: Length::Short,
        }
    }

    #[test]
    fn parses_browser_payload() {
        let form: PromptForm = serde_json::from_str(
            r#"{"category":"image","description":"a logo for a bakery","details":"","length":"long"}"#,
        )
        .unwrap();
        assert_eq!(form.category, Category::Image);
        assert_eq!(form.length, Length::Long);
        assert_eq!(form.details(), None);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_category() {
        let res = serde_json::from_str::<PromptForm>(
            r#"{"category":"audio","description":"a logo for a bakery","length":"long"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn decode_errors_name_the_offending_field() {
        let issues = PromptForm::from_json(&serde_json::json!({
            "category": "audio",
            "description": "a logo for a bakery",
            "length": "long"
        }))
        .unwrap_err();
        assert_eq!(issues[0].field, "category");

        let issues = PromptForm::from_json(&serde_json::json!({
            "category": "text",
            "description": "a logo for a bakery",
            "details": 42,
            "length": "long"
        }))
        .unwrap_err();
        assert_eq!(issues[0].field, "details");

        let issues = PromptForm::from_json(&serde_json::json!({
            "category": "text",
            "description": "a logo for a bakery"
        }))
        .unwrap_err();
        assert_eq!(issues[0].field, "length");

        let issues = PromptForm::from_json(&serde_json::json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(issues[0].field, "body");
    }

    #[test]
    fn from_json_accepts_null_details() {
        let form = PromptForm::from_json(&serde_json::json!({
            "category": "video",
            "description": "a trailer for a board game",
            "details": null,
            "length": "short"
        }))
        .unwrap();
        assert_eq!(form.category, Category::Video);
        assert_eq!(form.details(), None);
    }

    #[test]
    fn analytics_event_tolerates_missing_fields() {
        let event: AnalyticsEvent =
            serde_json::from_str(r#"{"properties":null}"#).unwrap();
        assert!(event.name.is_none());
        assert!(event.properties.is_none());

        let capture = CaptureRequest {
            event: event.name.as_deref(),
            properties: event.properties.as_ref(),
            timestamp: "2026-01-01T00:00:00+00:00".into(),
        };
        let json = serde_json::to_value(&capture).unwrap();
        assert_eq!(json, serde_json::json!({ "timestamp": "2026-01-01T00:00:00+00:00" }));
    }

    #[test]
    fn short_description_is_reported() {
        let issues = form("too short", None).validate().unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "description");
    }

    #[test]
    fn length_limits_count_characters_not_bytes() {
        let desc = "é".repeat(TEXT_MAX_CHARS);
        assert!(form(&desc, None).validate().is_ok());

        let long = "x".repeat(TEXT_MAX_CHARS + 1);
        let issues = form(&long, Some(&long)).validate().unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, ["description", "details"]);
    }

    #[test]
    fn response_uses_camel_case() {
        let json = serde_json::to_value(GenerateResponse {
            generated_prompt: "hi".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "generatedPrompt": "hi" }));
    }
}
