//! Student organization record schema
//!
//! The only naturally keyed kind: the org code is the primary key, supplied
//! by the caller on create and never store-assigned. Updates replace the
//! translations and active flag but never the code.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::resource::{ApiError, Params, Resource};

/// Collection name for organizations
pub const ORGANIZATION_COLLECTION: &str = "ucsborganizations";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UcsbOrganization {
    /// Natural string key, e.g. "ZPR" for Zeta Phi Rho
    pub org_code: String,

    pub org_translation_short: String,
    pub org_translation: String,
    pub inactive: bool,
}

impl IntoIndexes for UcsbOrganization {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "orgCode": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("org_code_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl Resource for UcsbOrganization {
    type Key = String;

    const KIND: &'static str = "UCSBOrganization";
    const COLLECTION: &'static str = ORGANIZATION_COLLECTION;
    const KEY_FIELD: &'static str = "orgCode";

    fn key(&self) -> Option<String> {
        Some(self.org_code.clone())
    }

    fn set_key(&mut self, key: String) {
        self.org_code = key;
    }

    fn merge_from(&mut self, incoming: Self) {
        self.org_translation_short = incoming.org_translation_short;
        self.org_translation = incoming.org_translation;
        self.inactive = incoming.inactive;
    }

    fn from_params(params: &Params) -> Result<Self, ApiError> {
        Ok(Self {
            org_code: params.require_str("orgCode")?,
            org_translation_short: params.require_str("orgTranslationShort")?,
            org_translation: params.require_str("orgTranslation")?,
            inactive: params.require("inactive")?,
        })
    }
}
