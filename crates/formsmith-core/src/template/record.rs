//! Flat template records and the slot codec.
//!
//! The backend stores each custom question as two sibling keys on the
//! template object, `<slot>_question` and `<slot>_state`. This module is the
//! only place that knows about that layout: it turns a flat JSON object
//! into an ordered list of [`QuestionSlot`]s and back.
//!
//! Slots are ordered by the number at the end of their name, never by the
//! order in which keys happen to come out of the map.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CustomField, FieldKind, QuestionBlock};
use crate::listing::TemplateId;
use crate::{Error, ErrorKind, Result};

/// A template object exactly as the backend sends it.
pub type FlatRecord = Map<String, Value>;

const QUESTION_SUFFIX: &str = "_question";
const STATE_SUFFIX: &str = "_state";
const SLOT_PREFIX: &str = "custom_";

/// One `<name>_question` / `<name>_state` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSlot {
    /// The shared `<name>` prefix.
    pub name: String,
    /// Kind, when it can be read from the slot name.
    pub kind: Option<FieldKind>,
    /// Question text; empty when missing or falsy.
    pub question: String,
    /// Value of the `_state` key.
    pub enabled: bool,
}

impl QuestionSlot {
    /// A slot is shown only when enabled and its text is non-empty.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.question.is_empty()
    }

    /// Key holding the question text.
    pub fn question_key(&self) -> String {
        format!("{}{QUESTION_SUFFIX}", self.name)
    }

    /// Key holding the active flag.
    pub fn state_key(&self) -> String {
        format!("{}{STATE_SUFFIX}", self.name)
    }

    /// Renders this slot as a display block.
    pub fn to_block(&self) -> QuestionBlock {
        QuestionBlock::new(&self.name, &self.question)
    }
}

/// Names slots `custom_<kind><n>`, where `n` is the 1-based authoring position.
pub fn encode_fields(fields: &[CustomField]) -> Vec<QuestionSlot> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| QuestionSlot {
            name: format!("{SLOT_PREFIX}{}{}", field.kind, i + 1),
            kind: Some(field.kind),
            question: field.question.clone(),
            enabled: field.enabled,
        })
        .collect()
}

/// Writes slots into a flat record as key pairs.
pub fn write_slots(record: &mut FlatRecord, slots: &[QuestionSlot]) {
    for slot in slots {
        record.insert(slot.question_key(), Value::String(slot.question.clone()));
        record.insert(slot.state_key(), Value::Bool(slot.enabled));
    }
}

/// Extracts all slots from a flat record in explicit order.
///
/// A `_state` key without its `_question` partner yields an empty (and so
/// inactive) question; a `_question` without a `_state` is disabled.
pub fn decode_slots(record: &FlatRecord) -> Vec<QuestionSlot> {
    let mut pairs: BTreeMap<&str, (Option<&Value>, Option<&Value>)> = BTreeMap::new();

    for (key, value) in record {
        if let Some(name) = key.strip_suffix(QUESTION_SUFFIX) {
            pairs.entry(name).or_default().0 = Some(value);
        } else if let Some(name) = key.strip_suffix(STATE_SUFFIX) {
            pairs.entry(name).or_default().1 = Some(value);
        }
    }

    let mut slots: Vec<QuestionSlot> = pairs
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, (question, state))| QuestionSlot {
            name: name.to_owned(),
            kind: kind_from_name(name),
            question: question.map(display_text).unwrap_or_default(),
            enabled: state.is_some_and(is_truthy),
        })
        .collect();

    slots.sort_by(|a, b| compare_slot_names(&a.name, &b.name));
    slots
}

/// Truthiness as the backend's JavaScript consumers see it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_text(value: &Value) -> String {
    match value {
        _ if !is_truthy(value) => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn trailing_number(name: &str) -> Option<u64> {
    let digits_start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    name[digits_start..].parse().ok()
}

fn kind_from_name(name: &str) -> Option<FieldKind> {
    let rest = name.strip_prefix(SLOT_PREFIX)?;
    let fragment = rest.trim_end_matches(|c: char| c.is_ascii_digit());
    FieldKind::from_slot_fragment(fragment)
}

/// Numbered slots first, by number; then unnumbered ones; ties by name.
fn compare_slot_names(a: &str, b: &str) -> Ordering {
    match (trailing_number(a), trailing_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// A single template, decoded from its flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlatRecord", into = "FlatRecord")]
pub struct TemplateRecord {
    pub id: Option<TemplateId>,
    pub title: String,
    pub description: String,
    pub created_at: Option<Timestamp>,
    /// All slots, active or not, in explicit order.
    pub slots: Vec<QuestionSlot>,
    /// Keys that are neither well-known fields nor slot keys.
    pub extra: FlatRecord,
}

impl TemplateRecord {
    /// Builds a record from authored parts.
    pub fn new(
        id: Option<TemplateId>,
        title: impl Into<String>,
        description: impl Into<String>,
        fields: &[CustomField],
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            created_at: None,
            slots: encode_fields(fields),
            extra: FlatRecord::new(),
        }
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Decodes a flat record.
    pub fn from_flat(record: FlatRecord) -> Result<Self> {
        let slots = decode_slots(&record);

        let mut id = None;
        let mut title = String::new();
        let mut description = String::new();
        let mut created_at = None;
        let mut extra = FlatRecord::new();

        for (key, value) in record {
            if key.ends_with(QUESTION_SUFFIX) || key.ends_with(STATE_SUFFIX) {
                continue;
            }

            match key.as_str() {
                "id" => {
                    id = Some(serde_json::from_value(value).map_err(|e| {
                        Error::from(e).with_context("template id")
                    })?);
                }
                "title" => title = string_field(value, "title")?,
                "description" => description = string_field(value, "description")?,
                "createdAt" => created_at = parse_timestamp(&value),
                _ => {
                    extra.insert(key, value);
                }
            }
        }

        Ok(Self {
            id,
            title,
            description,
            created_at,
            slots,
            extra,
        })
    }

    /// Encodes this record back into the backend's flat layout.
    pub fn to_flat(&self) -> FlatRecord {
        let mut record = self.extra.clone();

        if let Some(id) = &self.id
            && let Ok(value) = serde_json::to_value(id)
        {
            record.insert("id".into(), value);
        }
        record.insert("title".into(), Value::String(self.title.clone()));
        record.insert("description".into(), Value::String(self.description.clone()));
        if let Some(created_at) = self.created_at {
            record.insert("createdAt".into(), Value::String(created_at.to_string()));
        }

        write_slots(&mut record, &self.slots);
        record
    }

    /// Active questions in slot order.
    pub fn active_slots(&self) -> impl Iterator<Item = &QuestionSlot> {
        self.slots.iter().filter(|slot| slot.is_active())
    }

    /// Display blocks for the active questions, in slot order.
    pub fn question_blocks(&self) -> Vec<QuestionBlock> {
        self.active_slots().map(QuestionSlot::to_block).collect()
    }
}

impl TryFrom<FlatRecord> for TemplateRecord {
    type Error = Error;

    fn try_from(record: FlatRecord) -> Result<Self> {
        Self::from_flat(record)
    }
}

impl From<TemplateRecord> for FlatRecord {
    fn from(record: TemplateRecord) -> Self {
        record.to_flat()
    }
}

fn string_field(value: Value, name: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Err(ErrorKind::Serialization
            .with_message(format!("expected '{name}' to be a string, got {other}"))),
    }
}

fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    let text = value.as_str()?;
    match Timestamp::from_str(text) {
        Ok(timestamp) => Some(timestamp),
        Err(error) => {
            tracing::debug!(
                target: crate::TRACING_TARGET,
                value = text,
                error = %error,
                "Ignoring unparseable template timestamp"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn flat(value: Value) -> FlatRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test records are objects"),
        }
    }

    #[test]
    fn test_reconstruction_filters_inactive() {
        let record = TemplateRecord::from_flat(flat(json!({
            "a_state": true, "a_question": "Q1",
            "b_state": false, "b_question": "Q2",
            "c_state": true, "c_question": ""
        })))
        .unwrap();

        let blocks = record.question_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].label, "A");
        assert_eq!(blocks[0].text, "Q1");
        assert_eq!(record.slots.len(), 3);
    }

    #[test]
    fn test_backend_style_names() {
        let record = TemplateRecord::from_flat(flat(json!({
            "id": 12,
            "title": "Survey",
            "custom_int1_state": true,
            "custom_int1_question": "Age?",
            "custom_string1_state": true,
            "custom_string1_question": "Name?"
        })))
        .unwrap();

        let slots: Vec<_> = record
            .active_slots()
            .map(|s| (s.name.as_str(), s.kind))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("custom_int1", Some(FieldKind::Integer)),
                ("custom_string1", Some(FieldKind::String)),
            ]
        );
        assert_eq!(record.question_blocks()[1].label, "Custom string1");
    }

    #[test]
    fn test_order_follows_numeric_suffix() {
        let fields: Vec<_> = (0..12)
            .map(|i| {
                let kind = [FieldKind::String, FieldKind::Text, FieldKind::Checkbox][i % 3];
                CustomField::new(kind).with_question(format!("Q{i}"))
            })
            .collect();

        let record = TemplateRecord::new(Some(TemplateId::from(1)), "t", "d", &fields);
        let decoded = TemplateRecord::from_flat(record.to_flat()).unwrap();

        let texts: Vec<_> = decoded.question_blocks().into_iter().map(|b| b.text).collect();
        let expected: Vec<_> = (0..12).map(|i| format!("Q{i}")).collect();
        assert_eq!(texts, expected);

        let kinds: Vec<_> = decoded.slots.iter().map(|s| s.kind).collect();
        let authored: Vec<_> = fields.iter().map(|f| Some(f.kind)).collect();
        assert_eq!(kinds, authored);
    }

    #[test]
    fn test_unpaired_keys() {
        let slots = decode_slots(&flat(json!({
            "orphan_state": true,
            "lonely_question": "Shown?"
        })));

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| !s.is_active()));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));

        let slots = decode_slots(&flat(json!({ "x1_state": 1, "x1_question": 0 })));
        assert!(slots[0].enabled);
        assert!(!slots[0].is_active());
    }

    #[test]
    fn test_known_fields_and_extra() {
        let record: TemplateRecord = serde_json::from_value(json!({
            "id": "abc",
            "title": "T",
            "description": null,
            "createdAt": "2024-11-02T10:15:00.000Z",
            "authorId": 5
        }))
        .unwrap();

        assert_eq!(record.id.as_ref().map(TemplateId::as_str), Some("abc"));
        assert!(record.description.is_empty());
        assert!(record.created_at.is_some());
        assert_eq!(record.extra.get("authorId"), Some(&json!(5)));
        assert!(record.question_blocks().is_empty());
    }

    #[test]
    fn test_bad_created_at_is_ignored() {
        let record = TemplateRecord::from_flat(flat(json!({ "createdAt": "yesterday" }))).unwrap();
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_non_string_title_is_rejected() {
        let error = TemplateRecord::from_flat(flat(json!({ "title": 5 }))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }
}
