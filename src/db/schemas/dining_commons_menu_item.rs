//! Dining commons menu item record schema
//!
//! Wire names are snake_case for this kind (legacy contract), so no
//! rename_all here.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::resource::{ApiError, Params, Resource};

/// Collection name for dining commons menu items
pub const DINING_COMMONS_MENU_ITEM_COLLECTION: &str = "ucsbdiningcommonsmenuitems";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UcsbDiningCommonsMenuItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub dining_commons_code: String,
    pub name: String,
    pub station: String,
}

impl IntoIndexes for UcsbDiningCommonsMenuItem {
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

impl Resource for UcsbDiningCommonsMenuItem {
    type Key = i64;

    const KIND: &'static str = "UCSBDiningCommonsMenuItem";
    const COLLECTION: &'static str = DINING_COMMONS_MENU_ITEM_COLLECTION;
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn merge_from(&mut self, incoming: Self) {
        self.dining_commons_code = incoming.dining_commons_code;
        self.name = incoming.name;
        self.station = incoming.station;
    }

    fn from_params(params: &Params) -> Result<Self, ApiError> {
        Ok(Self {
            id: None,
            dining_commons_code: params.require_str("dining_commons_code")?,
            name: params.require_str("name")?,
            station: params.require_str("station")?,
        })
    }
}
