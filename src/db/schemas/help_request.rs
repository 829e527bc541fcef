//! Help request record schema
//!
//! A request for staff help at a table or breakout room during a session.

use bson::{doc, Document};
use chrono::NaiveDateTime;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::resource::{ApiError, Params, Resource};

/// Collection name for help requests
pub const HELP_REQUEST_COLLECTION: &str = "helprequests";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub requester_email: String,
    pub team_id: String,
    pub table_or_breakout_room: String,
    pub explanation: String,
    pub solved: bool,
    pub request_time: NaiveDateTime,
}

impl IntoIndexes for HelpRequest {
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

impl Resource for HelpRequest {
    type Key = i64;

    const KIND: &'static str = "HelpRequest";
    const COLLECTION: &'static str = HELP_REQUEST_COLLECTION;
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn merge_from(&mut self, incoming: Self) {
        self.requester_email = incoming.requester_email;
        self.team_id = incoming.team_id;
        self.table_or_breakout_room = incoming.table_or_breakout_room;
        self.explanation = incoming.explanation;
        self.solved = incoming.solved;
        self.request_time = incoming.request_time;
    }

    fn from_params(params: &Params) -> Result<Self, ApiError> {
        Ok(Self {
            id: None,
            requester_email: params.require_str("requesterEmail")?,
            team_id: params.require_str("teamId")?,
            table_or_breakout_room: params.require_str("tableOrBreakoutRoom")?,
            explanation: params.require_str("explanation")?,
            solved: params.require("solved")?,
            request_time: params.require("requestTime")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params() {
        let params = Params::from_query(Some(
            "requesterEmail=a%40b.edu&teamId=t1&tableOrBreakoutRoom=5\
             &explanation=x&solved=false&requestTime=2022-01-03T00%3A00%3A00",
        ));

        let request = HelpRequest::from_params(&params).unwrap();
        assert_eq!(request.id, None);
        assert_eq!(request.requester_email, "a@b.edu");
        assert_eq!(request.team_id, "t1");
        assert_eq!(request.table_or_breakout_room, "5");
        assert_eq!(request.explanation, "x");
        assert!(!request.solved);
        assert_eq!(request.request_time.to_string(), "2022-01-03 00:00:00");
    }

    #[test]
    fn test_merge_preserves_key() {
        let mut stored = HelpRequest {
            id: Some(7),
            requester_email: "old@b.edu".into(),
            ..Default::default()
        };

        let incoming = HelpRequest {
            id: Some(999),
            requester_email: "new@b.edu".into(),
            team_id: "t2".into(),
            table_or_breakout_room: "12".into(),
            explanation: "moved".into(),
            solved: true,
            request_time: "2023-05-01T08:30:00".parse().unwrap(),
        };

        stored.merge_from(incoming);
        assert_eq!(stored.id, Some(7));
        assert_eq!(stored.requester_email, "new@b.edu");
        assert!(stored.solved);
    }
}
