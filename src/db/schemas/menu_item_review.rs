//! Menu item review record schema

use bson::{doc, Document};
use chrono::NaiveDateTime;
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::resource::{ApiError, Params, Resource};

/// Collection name for menu item reviews
pub const MENU_ITEM_REVIEW_COLLECTION: &str = "menuitemreviews";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Numeric id of the reviewed menu item
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    pub date_reviewed: NaiveDateTime,
    pub comments: String,
}

impl IntoIndexes for MenuItemReview {
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

impl Resource for MenuItemReview {
    type Key = i64;

    const KIND: &'static str = "MenuItemReview";
    const COLLECTION: &'static str = MENU_ITEM_REVIEW_COLLECTION;
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn merge_from(&mut self, incoming: Self) {
        self.item_id = incoming.item_id;
        self.reviewer_email = incoming.reviewer_email;
        self.stars = incoming.stars;
        self.date_reviewed = incoming.date_reviewed;
        self.comments = incoming.comments;
    }

    fn from_params(params: &Params) -> Result<Self, ApiError> {
        Ok(Self {
            id: None,
            item_id: params.require("itemId")?,
            reviewer_email: params.require_str("reviewerEmail")?,
            stars: params.require("stars")?,
            date_reviewed: params.require("dateReviewed")?,
            comments: params.require_str("comments")?,
        })
    }
}
