//! Article record schema

use bson::{doc, Document};
use chrono::NaiveDateTime;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::resource::{ApiError, Params, Resource};

/// Collection name for articles
pub const ARTICLE_COLLECTION: &str = "articles";

/// A published article reference: title, link, and submission time
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Store-assigned numeric key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub title: String,
    pub url: String,
    pub explanation: String,
    pub email: String,
    pub local_date_time: NaiveDateTime,
}

impl IntoIndexes for Article {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl Resource for Article {
    type Key = i64;

    const KIND: &'static str = "Article";
    const COLLECTION: &'static str = ARTICLE_COLLECTION;
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn merge_from(&mut self, incoming: Self) {
        self.title = incoming.title;
        self.url = incoming.url;
        self.explanation = incoming.explanation;
        self.email = incoming.email;
        self.local_date_time = incoming.local_date_time;
    }

    fn from_params(params: &Params) -> Result<Self, ApiError> {
        Ok(Self {
            id: None,
            title: params.require_str("title")?,
            url: params.require_str("url")?,
            explanation: params.require_str("explanation")?,
            email: params.require_str("email")?,
            local_date_time: params.require("localDateTime")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let article = Article {
            id: Some(3),
            title: "Title".into(),
            url: "https://example.org".into(),
            explanation: "Why".into(),
            email: "a@b.edu".into(),
            local_date_time: "2022-01-03T00:00:00".parse().unwrap(),
        };

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["localDateTime"], "2022-01-03T00:00:00");
    }

    #[test]
    fn test_unset_key_omitted_from_wire() {
        let article = Article::default();
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("id").is_none());
    }
}
