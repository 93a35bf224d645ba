//! Template schemas for role-level answers and scorecard data.
//!
//! A template `structure` is an array of groups, each listing the fields a
//! record may answer. Role-level templates must declare a `level_info`
//! group and scorecard templates a `scorecard_info` group.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::coerce::is_blank;
use crate::document::{AnswersDocument, DocumentError};
use crate::error::CoreError;
use crate::messages;

/// Group every role-level template and answers document must carry.
pub const LEVEL_INFO_GROUP: &str = "level_info";

/// Group every scorecard template must carry.
pub const SCORECARD_INFO_GROUP: &str = "scorecard_info";

// ---------------------------------------------------------------------------
// Structure types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customize_field_label: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub is_required: bool,
}

impl TemplateField {
    /// The label shown to users: the customized label when set, else `label`.
    pub fn display_label(&self) -> &str {
        self.customize_field_label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateGroup {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
}

/// A parsed template structure.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateStructure {
    pub groups: Vec<TemplateGroup>,
}

impl TemplateStructure {
    /// Parse a structure given as a JSON array or a string containing one.
    pub fn parse(value: &Value) -> Result<Self, CoreError> {
        Self::decode(value).map(|(structure, _)| structure)
    }

    /// Parse a structure and also return the decoded JSON for storage.
    pub fn decode(value: &Value) -> Result<(Self, Value), CoreError> {
        let invalid = || CoreError::validation(messages::INVALID_TEMPLATE_STRUCTURE);
        let raw = match value {
            Value::String(s) => serde_json::from_str::<Value>(s).map_err(|_| invalid())?,
            other => other.clone(),
        };
        let groups: Vec<TemplateGroup> =
            serde_json::from_value(raw.clone()).map_err(|_| invalid())?;
        if groups.is_empty() {
            return Err(invalid());
        }
        let blank_id = groups.iter().any(|g| {
            g.id.trim().is_empty() || g.fields.iter().any(|f| f.id.trim().is_empty())
        });
        if blank_id {
            return Err(invalid());
        }
        Ok((Self { groups }, raw))
    }

    pub fn has_group(&self, id: &str) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    /// Every `(group, field)` pair in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&TemplateGroup, &TemplateField)> {
        self.groups
            .iter()
            .flat_map(|g| g.fields.iter().map(move |f| (g, f)))
    }

    /// First field whose display label or base label matches `label`,
    /// ignoring ASCII case and surrounding whitespace.
    pub fn find_field_by_label(&self, label: &str) -> Option<(&TemplateGroup, &TemplateField)> {
        self.fields().find(|(_, f)| {
            f.label.trim().eq_ignore_ascii_case(label)
                || f.display_label().trim().eq_ignore_ascii_case(label)
        })
    }

    /// Require the structural group a record family depends on.
    pub fn require_group(&self, id: &str) -> Result<(), CoreError> {
        if self.has_group(id) {
            Ok(())
        } else {
            Err(CoreError::validation(messages::INVALID_TEMPLATE_ID))
        }
    }

    /// Check that every field flagged `is_required` has a non-blank answer.
    pub fn check_required(&self, answers: &AnswersDocument) -> Result<(), DocumentError> {
        match self
            .fields()
            .filter(|(_, f)| f.is_required)
            .find(|(g, f)| is_blank(answers.field(&g.id, &f.id)))
        {
            Some((_, f)) => Err(DocumentError::RequiredField(f.display_label().to_string())),
            None => Ok(()),
        }
    }
}

/// A column definition returned by the `tableHeaders` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableHeader {
    pub id: String,
    pub label: String,
}

impl TableHeader {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Template drafts
// ---------------------------------------------------------------------------

/// Input for creating or renaming a template.
#[derive(Debug, Clone, Validate)]
pub struct TemplateDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

impl TemplateDraft {
    pub fn validated(name: String) -> Result<Self, CoreError> {
        let draft = Self { name };
        draft
            .validate()
            .map_err(|_| CoreError::validation(messages::TEMPLATE_NAME_REQUIRED))?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn level_structure() -> Value {
        json!([
            {
                "id": "level_info",
                "fields": [
                    {"id": "level_name", "label": "Level", "customize_field_label": "Job Level"},
                    {"id": "rank", "label": "Rank/Order", "type": "number", "is_required": true}
                ]
            },
            {"id": "custom_fields", "fields": [{"id": "notes", "label": "Notes"}]}
        ])
    }

    #[test]
    fn parses_array_and_string_forms() {
        let s = TemplateStructure::parse(&level_structure()).unwrap();
        assert_eq!(s.groups.len(), 2);
        let encoded = Value::String(level_structure().to_string());
        assert_eq!(TemplateStructure::parse(&encoded).unwrap(), s);
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in [json!({"id": "x"}), json!([]), json!("nope"), json!([{"id": ""}])] {
            assert_matches!(TemplateStructure::parse(&bad), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn customized_label_wins_for_display() {
        let s = TemplateStructure::parse(&level_structure()).unwrap();
        let (_, f) = s.find_field_by_label("level").unwrap();
        assert_eq!(f.id, "level_name");
        assert_eq!(f.display_label(), "Job Level");
        assert!(s.find_field_by_label("job level").is_some());
    }

    #[test]
    fn require_group_reports_invalid_template() {
        let s = TemplateStructure::parse(&level_structure()).unwrap();
        assert!(s.require_group(LEVEL_INFO_GROUP).is_ok());
        assert_matches!(
            s.require_group(SCORECARD_INFO_GROUP),
            Err(CoreError::Validation(m)) if m == messages::INVALID_TEMPLATE_ID
        );
    }

    #[test]
    fn required_fields_must_be_answered() {
        let s = TemplateStructure::parse(&level_structure()).unwrap();
        let missing = AnswersDocument::parse(
            Some(&json!({"level_info": {"level_name": "Lead", "rank": " "}})),
            LEVEL_INFO_GROUP,
        )
        .unwrap();
        assert_matches!(
            s.check_required(&missing),
            Err(DocumentError::RequiredField(label)) if label == "Rank/Order"
        );

        let complete = AnswersDocument::parse(
            Some(&json!({"level_info": {"level_name": "Lead", "rank": 2}})),
            LEVEL_INFO_GROUP,
        )
        .unwrap();
        assert!(s.check_required(&complete).is_ok());
    }

    #[test]
    fn template_names_are_length_checked() {
        assert!(TemplateDraft::validated("Engineering ladder".into()).is_ok());
        assert!(TemplateDraft::validated(String::new()).is_err());
        assert!(TemplateDraft::validated("x".repeat(201)).is_err());
    }
}
