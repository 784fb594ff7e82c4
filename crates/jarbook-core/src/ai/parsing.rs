//! JSON parsing helpers for AI backend responses
//!
//! Models occasionally wrap the JSON payload in prose or code fences even when
//! asked for structured output, so the outermost object is extracted first.
//! The object is then checked against its schema before typed deserialization.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::pyramid::PyramidLevel;

use super::schema::ResponseSchema;
use super::types::{CoachingResult, ContentIdea, GoalStrategy};

const RAW_PREVIEW_LEN: usize = 200;

/// Shorten a raw response for error messages
fn preview(raw: &str) -> String {
    if raw.len() > RAW_PREVIEW_LEN {
        let mut end = RAW_PREVIEW_LEN;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &raw[..end])
    } else {
        raw.to_string()
    }
}

/// Slice from the first `{` to the last `}`
pub fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();
    match (response.find('{'), response.rfind('}')) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            preview(response)
        ))),
    }
}

/// Extract, schema-check and deserialize a structured response
pub fn parse_structured<T: DeserializeOwned>(response: &str, schema: &ResponseSchema) -> Result<T> {
    let json_str = extract_json_object(response)?;
    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            preview(json_str)
        ))
    })?;

    schema.check(&value).map_err(|problem| {
        Error::InvalidData(format!(
            "AI response does not match {} schema: {}",
            schema.name, problem
        ))
    })?;

    serde_json::from_value(value)
        .map_err(|e| Error::InvalidData(format!("Invalid {} from AI: {}", schema.name, e)))
}

/// Parse a coaching result, rejecting levels outside the pyramid
pub fn parse_coaching_result(response: &str) -> Result<CoachingResult> {
    // Levels above 255 or below 0 already fail the u8 conversion
    let result: CoachingResult = parse_structured(response, &ResponseSchema::coaching())?;

    if PyramidLevel::from_number(i64::from(result.current_level)).is_none() {
        return Err(Error::InvalidData(format!(
            "currentLevel out of range: {}",
            result.current_level
        )));
    }
    Ok(result)
}

pub fn parse_goal_strategy(response: &str) -> Result<GoalStrategy> {
    parse_structured(response, &ResponseSchema::goal_strategy())
}

pub fn parse_content_idea(response: &str) -> Result<ContentIdea> {
    parse_structured(response, &ResponseSchema::content_idea())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::FeasibilityStatus;

    const COACHING: &str = r#"{
        "currentLevel": 2,
        "factIdentification": "You spend everything you earn.",
        "timeImpact": "In 5 years nothing changes.",
        "priceToPay": "Freedom.",
        "specificAdjustment": "Move 10% to reserve on payday.",
        "accountabilityQuestion": "What is one thing you will cut this week?",
        "financialLongevity": "1 month",
        "healthWarning": "Stress from zero buffer."
    }"#;

    #[test]
    fn test_parse_coaching_result() {
        let result = parse_coaching_result(COACHING).unwrap();
        assert_eq!(result.current_level, 2);
        assert_eq!(result.financial_longevity, "1 month");
        assert_eq!(
            result.health_warning.as_deref(),
            Some("Stress from zero buffer.")
        );
    }

    #[test]
    fn test_parse_with_surrounding_text() {
        let wrapped = format!("Here you go:\n```json\n{}\n```", COACHING);
        assert!(parse_coaching_result(&wrapped).is_ok());
    }

    #[test]
    fn test_missing_accountability_question() {
        let mut value: Value = serde_json::from_str(COACHING).unwrap();
        value.as_object_mut().unwrap().remove("accountabilityQuestion");
        let err = parse_coaching_result(&value.to_string()).unwrap_err();
        match err {
            Error::InvalidData(msg) => assert!(msg.contains("accountabilityQuestion")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_level_out_of_range() {
        for level in [0, 8, -1, 300] {
            let mut value: Value = serde_json::from_str(COACHING).unwrap();
            value["currentLevel"] = serde_json::json!(level);
            assert!(
                parse_coaching_result(&value.to_string()).is_err(),
                "level {} accepted",
                level
            );
        }
    }

    #[test]
    fn test_no_json() {
        assert!(parse_coaching_result("I cannot help with that.").is_err());
        assert!(parse_coaching_result("").is_err());
        assert!(parse_coaching_result("{ not json }").is_err());
    }

    #[test]
    fn test_parse_goal_strategy_unknown_feasibility() {
        let json = r#"{
            "factIdentification": "a",
            "timeImpact": "b",
            "priceToPay": "c",
            "specificAdjustment": "d",
            "accountabilityQuestion": "e",
            "monthlyTarget": "12,500,000 VND",
            "feasibilityStatus": "doable-ish"
        }"#;
        let strategy = parse_goal_strategy(json).unwrap();
        assert_eq!(strategy.feasibility_status, FeasibilityStatus::Unknown);
        assert_eq!(strategy.monthly_target, "12,500,000 VND");
    }

    #[test]
    fn test_parse_content_idea() {
        let json = r#"{"strategyTag":"Value","contentType":"Q&A","hook":"Stop saving like this","scriptOutline":["Hook","Story","Lesson"]}"#;
        let idea = parse_content_idea(json).unwrap();
        assert_eq!(idea.script_outline.len(), 3);

        let missing = r#"{"strategyTag":"Value","contentType":"Q&A","hook":"x"}"#;
        assert!(parse_content_idea(missing).is_err());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(300);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert!(shown.len() <= RAW_PREVIEW_LEN + 3);
    }
}
