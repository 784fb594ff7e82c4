//! Fixed response schemas
//!
//! One neutral description per response type, rendered into each backend's
//! structured-output dialect and used to check replies for required fields.

use serde_json::{json, Map, Value};

/// JSON type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    StringArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: Option<&'static str>,
    pub required: bool,
}

impl SchemaField {
    fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            description: None,
            required: true,
        }
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Whether a JSON value has this field's type
    fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// Object schema for one response type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub fields: Vec<SchemaField>,
}

const NARRATIVE: [&str; 5] = [
    "factIdentification",
    "timeImpact",
    "priceToPay",
    "specificAdjustment",
    "accountabilityQuestion",
];

fn narrative_fields() -> impl Iterator<Item = SchemaField> {
    NARRATIVE
        .into_iter()
        .map(|name| SchemaField::required(name, FieldKind::String))
}

impl ResponseSchema {
    pub fn coaching() -> Self {
        let mut fields =
            vec![SchemaField::required("currentLevel", FieldKind::Integer)
                .describe("Pyramid level 1-7")];
        fields.extend(narrative_fields());
        fields.push(
            SchemaField::required("financialLongevity", FieldKind::String)
                .describe("Projected financial longevity"),
        );
        fields.push(
            SchemaField::required("healthWarning", FieldKind::String)
                .describe("Health or lifestyle warning, if any")
                .optional(),
        );
        Self {
            name: "coaching_result",
            fields,
        }
    }

    pub fn goal_strategy() -> Self {
        let mut fields: Vec<SchemaField> = narrative_fields().collect();
        fields.push(SchemaField::required("monthlyTarget", FieldKind::String));
        fields.push(
            SchemaField::required("feasibilityStatus", FieldKind::String)
                .describe("One of safe, challenging, atRisk"),
        );
        Self {
            name: "goal_strategy",
            fields,
        }
    }

    pub fn content_idea() -> Self {
        Self {
            name: "content_idea",
            fields: vec![
                SchemaField::required("strategyTag", FieldKind::String),
                SchemaField::required("contentType", FieldKind::String),
                SchemaField::required("hook", FieldKind::String),
                SchemaField::required("scriptOutline", FieldKind::StringArray),
            ],
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Check an object against the schema
    ///
    /// Returns a description of the first problem: a missing or null required
    /// field, or a present field of the wrong type.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        let Some(object) = value.as_object() else {
            return Err("response is not a JSON object".to_string());
        };
        for field in &self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(format!("missing required field `{}`", field.name));
                }
                None | Some(Value::Null) => {}
                Some(v) if !field.accepts(v) => {
                    return Err(format!("field `{}` has the wrong type", field.name));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Gemini `responseSchema` (OpenAPI subset, upper-case type names)
    pub fn to_gemini(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut prop = match field.kind {
                FieldKind::String => json!({ "type": "STRING" }),
                FieldKind::Integer => json!({ "type": "INTEGER" }),
                FieldKind::StringArray => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            };
            if let Some(desc) = field.description {
                prop["description"] = json!(desc);
            }
            properties.insert(field.name.to_string(), prop);
        }
        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.required_fields().collect::<Vec<_>>(),
        })
    }

    /// Standard JSON Schema for OpenAI-style `response_format`
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut prop = match field.kind {
                FieldKind::String => json!({ "type": "string" }),
                FieldKind::Integer => json!({ "type": "integer" }),
                FieldKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            };
            if let Some(desc) = field.description {
                prop["description"] = json!(desc);
            }
            properties.insert(field.name.to_string(), prop);
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_fields().collect::<Vec<_>>(),
        })
    }
}
