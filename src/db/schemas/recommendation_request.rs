//! Recommendation request record schema
//!
//! A student's request for a letter of recommendation. Creation does not
//! take `done`; new requests always start out not done.

use bson::{doc, Document};
use chrono::NaiveDateTime;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::resource::{ApiError, Params, Resource};

/// Collection name for recommendation requests
pub const RECOMMENDATION_REQUEST_COLLECTION: &str = "recommendationrequests";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub requester_email: String,
    pub professor_email: String,
    pub explanation: String,
    pub date_requested: NaiveDateTime,
    pub date_needed: NaiveDateTime,
    pub done: bool,
}

impl IntoIndexes for RecommendationRequest {
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

impl Resource for RecommendationRequest {
    type Key = i64;

    const KIND: &'static str = "RecommendationRequest";
    const COLLECTION: &'static str = RECOMMENDATION_REQUEST_COLLECTION;
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn merge_from(&mut self, incoming: Self) {
        self.requester_email = incoming.requester_email;
        self.professor_email = incoming.professor_email;
        self.explanation = incoming.explanation;
        self.date_requested = incoming.date_requested;
        self.date_needed = incoming.date_needed;
        self.done = incoming.done;
    }

    fn from_params(params: &Params) -> Result<Self, ApiError> {
        Ok(Self {
            id: None,
            requester_email: params.require_str("requesterEmail")?,
            professor_email: params.require_str("professorEmail")?,
            explanation: params.require_str("explanation")?,
            date_requested: params.require("dateRequested")?,
            date_needed: params.require("dateNeeded")?,
            done: false,
        })
    }
}
