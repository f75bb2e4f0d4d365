//! Collection items returned by the listing endpoints.

mod id;

pub use id::{FormId, TemplateId};
use serde::{Deserialize, Serialize};

/// Author of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
}

/// A template as it appears in latest, popular, search and "mine" lists.
///
/// `Forms` is part of the contract: the backend must always send it as a
/// (possibly empty) array, and a listing without it fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: Author,
    #[serde(rename = "Forms")]
    pub forms: Vec<serde_json::Value>,
}

impl TemplateSummary {
    /// Number of forms submitted against this template.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }
}

/// A template owned by the current user, as listed on their page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedTemplate {
    pub id: TemplateId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Title and description of the template a form answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A form the current user has submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    #[serde(default)]
    pub template: Option<FormTemplate>,
}

/// A listing entry with its 1-based rank, as shown in the popular table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub rank: usize,
    pub item: T,
}

/// Keeps the first `limit` items in response order.
///
/// Truncation is purely for display; the server is not asked to page.
pub fn take_first<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}

/// Keeps the first `limit` items and numbers them from 1.
pub fn rank_first<T>(items: Vec<T>, limit: usize) -> Vec<Ranked<T>> {
    take_first(items, limit)
        .into_iter()
        .enumerate()
        .map(|(i, item)| Ranked { rank: i + 1, item })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_summary_decodes() {
        let summary: TemplateSummary = serde_json::from_value(json!({
            "id": 3,
            "title": "Feedback",
            "description": "Tell us",
            "author": { "name": "Sam" },
            "Forms": [{ "id": 1 }, { "id": 2 }]
        }))
        .unwrap();

        assert_eq!(summary.id.as_str(), "3");
        assert_eq!(summary.author.name, "Sam");
        assert_eq!(summary.form_count(), 2);
    }

    #[test]
    fn test_summary_requires_forms() {
        let result = serde_json::from_value::<TemplateSummary>(json!({
            "id": 3,
            "title": "Feedback",
            "author": { "name": "Sam" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_form_summary_without_template() {
        let form: FormSummary = serde_json::from_value(json!({ "id": 9 })).unwrap();
        assert!(form.template.is_none());
    }

    #[test]
    fn test_take_and_rank() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(take_first(items.clone(), 6), vec![0, 1, 2, 3, 4, 5]);

        let ranked = rank_first(items, 5);
        let ranks: Vec<_> = ranked.iter().map(|r| (r.rank, r.item)).collect();
        assert_eq!(ranks, vec![(1, 0), (2, 1), (3, 2), (4, 3), (5, 4)]);

        assert_eq!(take_first(vec![1, 2], 6), vec![1, 2]);
    }
}
