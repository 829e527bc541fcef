//! The generic entity CRUD resource
//!
//! Every record kind in Registrar is a flat document behind the same five
//! operations (list, get, create, update, delete). This module holds the
//! one abstraction instantiated per kind: the [`Resource`] trait describing
//! a record and its key, the [`ResourceStore`] persistence seam, and the
//! generic operations in [`ops`].

pub mod error;
pub mod ops;
pub mod params;
pub mod store;

pub use error::ApiError;
pub use params::Params;
pub use store::{MemoryDb, MemoryStore, MongoStore, ResourceStore};

use bson::{Bson, Document};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;

use crate::db::mongo::IntoIndexes;

/// Primary key of a record kind
///
/// Keys are either numeric (allocated from the store's auto-increment
/// sequence) or a natural string code supplied by the caller.
pub trait ResourceKey: Clone + Display + Send + Sync {
    /// Parse a key from its query-parameter form
    fn parse(raw: &str) -> Option<Self>;

    /// Build a key from the auto-increment sequence.
    /// Returns None for key kinds that are never store-assigned.
    fn from_sequence(n: i64) -> Option<Self>;

    /// BSON form used in store filters
    fn to_bson(&self) -> Bson;
}

impl ResourceKey for i64 {
    fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    fn from_sequence(n: i64) -> Option<Self> {
        Some(n)
    }

    fn to_bson(&self) -> Bson {
        Bson::Int64(*self)
    }
}

impl ResourceKey for String {
    fn parse(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn from_sequence(_n: i64) -> Option<Self> {
        None
    }

    fn to_bson(&self) -> Bson {
        Bson::String(self.clone())
    }
}

/// A flat record kind exposed as a CRUD resource
///
/// Implementations live in [`crate::db::schemas`], one per entity kind.
/// The serde representation is both the wire format and the stored document,
/// so created records round-trip byte-for-byte.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + Unpin + Send + Sync + IntoIndexes + 'static
{
    type Key: ResourceKey;

    /// Entity kind name used in client-facing messages ("HelpRequest")
    const KIND: &'static str;

    /// Store collection name
    const COLLECTION: &'static str;

    /// Wire name of the key field; doubles as the lookup query parameter
    const KEY_FIELD: &'static str;

    /// The record's key, if assigned
    fn key(&self) -> Option<Self::Key>;

    /// Assign the key. Callers only do this once, at insert time.
    fn set_key(&mut self, key: Self::Key);

    /// Overwrite every non-key field with the incoming record's values
    fn merge_from(&mut self, incoming: Self);

    /// Build a new record (key unset unless naturally keyed) from
    /// individually named creation parameters
    fn from_params(params: &Params) -> Result<Self, ApiError>;

    /// Store filter selecting this kind's record with the given key
    fn key_filter(key: &Self::Key) -> Document {
        let mut filter = Document::new();
        filter.insert(Self::KEY_FIELD, key.to_bson());
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_key_parsing() {
        assert_eq!(<i64 as ResourceKey>::parse("42"), Some(42));
        assert_eq!(<i64 as ResourceKey>::parse("nope"), None);
        assert_eq!(<i64 as ResourceKey>::from_sequence(7), Some(7));
    }

    #[test]
    fn test_string_key_parsing() {
        assert_eq!(
            <String as ResourceKey>::parse("ZPR"),
            Some("ZPR".to_string())
        );
        assert_eq!(<String as ResourceKey>::from_sequence(7), None);
    }

    #[test]
    fn test_key_bson_forms() {
        assert_eq!(ResourceKey::to_bson(&42_i64), Bson::Int64(42));
        assert_eq!(
            ResourceKey::to_bson(&"ZPR".to_string()),
            Bson::String("ZPR".to_string())
        );
    }
}
