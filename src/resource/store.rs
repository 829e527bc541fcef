//! Persistence seam for resources
//!
//! The generic operations only see [`ResourceStore`]; implementations are
//! MongoDB for production and an in-memory map for dev mode and tests.

use async_trait::async_trait;
use bson::Document;
use dashmap::DashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::db::mongo::MongoCollection;
use crate::db::MongoClient;
use crate::resource::{Resource, ResourceKey};
use crate::types::{RegistrarError, Result};

/// Persistence of one record kind by key
#[async_trait]
pub trait ResourceStore<T: Resource>: Send + Sync {
    /// All records, store natural order
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Record with the given key, if present
    async fn find_by_key(&self, key: &T::Key) -> Result<Option<T>>;

    /// Insert (allocating the key when unset) or fully replace, returning
    /// the persisted record
    async fn save(&self, entity: T) -> Result<T>;

    /// Remove the record
    async fn delete(&self, entity: &T) -> Result<()>;
}

/// MongoDB-backed store
pub struct MongoStore<T> {
    client: MongoClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> MongoStore<T> {
    pub fn new(client: MongoClient) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    async fn collection(&self) -> Result<MongoCollection<T>> {
        self.client.collection(T::COLLECTION).await
    }
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for MongoStore<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        self.collection().await?.find_many(Document::new()).await
    }

    async fn find_by_key(&self, key: &T::Key) -> Result<Option<T>> {
        self.collection().await?.find_one(T::key_filter(key)).await
    }

    async fn save(&self, mut entity: T) -> Result<T> {
        let key = match entity.key() {
            Some(key) => key,
            None => {
                let seq = self.client.next_sequence(T::COLLECTION).await?;
                let key = T::Key::from_sequence(seq).ok_or_else(|| {
                    RegistrarError::Database(format!(
                        "{} records require an explicit key",
                        T::KIND
                    ))
                })?;
                entity.set_key(key.clone());
                key
            }
        };

        self.collection()
            .await?
            .replace_upsert(T::key_filter(&key), &entity)
            .await?;

        Ok(entity)
    }

    async fn delete(&self, entity: &T) -> Result<()> {
        let key = entity
            .key()
            .ok_or_else(|| RegistrarError::Database(format!("{} record has no key", T::KIND)))?;

        self.collection().await?.delete_one(T::key_filter(&key)).await
    }
}

/// Shared in-memory database, one document map per collection
///
/// Records are stored as BSON documents keyed by their stringified key, so
/// the memory store exercises the same serde path as MongoDB.
#[derive(Debug, Default)]
pub struct MemoryDb {
    collections: DashMap<&'static str, DashMap<String, Document>>,
    counters: DashMap<&'static str, i64>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&self, collection: &'static str) -> i64 {
        let mut counter = self.counters.entry(collection).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// In-memory store for dev mode and tests
pub struct MemoryStore<T> {
    db: Arc<MemoryDb>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> MemoryStore<T> {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    fn decode(doc: Document) -> Result<T> {
        bson::from_document(doc)
            .map_err(|e| RegistrarError::Database(format!("Malformed stored document: {}", e)))
    }

    fn encode(entity: &T) -> Result<Document> {
        bson::to_document(entity)
            .map_err(|e| RegistrarError::Database(format!("Failed to encode document: {}", e)))
    }
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for MemoryStore<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        let docs: Vec<Document> = match self.db.collections.get(T::COLLECTION) {
            Some(coll) => coll.iter().map(|entry| entry.value().clone()).collect(),
            None => Vec::new(),
        };

        docs.into_iter().map(Self::decode).collect()
    }

    async fn find_by_key(&self, key: &T::Key) -> Result<Option<T>> {
        let doc = self
            .db
            .collections
            .get(T::COLLECTION)
            .and_then(|coll| coll.get(&key.to_string()).map(|entry| entry.value().clone()));

        doc.map(Self::decode).transpose()
    }

    async fn save(&self, mut entity: T) -> Result<T> {
        let key = match entity.key() {
            Some(key) => key,
            None => {
                let seq = self.db.next_sequence(T::COLLECTION);
                let key = T::Key::from_sequence(seq).ok_or_else(|| {
                    RegistrarError::Database(format!(
                        "{} records require an explicit key",
                        T::KIND
                    ))
                })?;
                entity.set_key(key.clone());
                key
            }
        };

        let doc = Self::encode(&entity)?;
        self.db
            .collections
            .entry(T::COLLECTION)
            .or_default()
            .insert(key.to_string(), doc);

        Ok(entity)
    }

    async fn delete(&self, entity: &T) -> Result<()> {
        let key = entity
            .key()
            .ok_or_else(|| RegistrarError::Database(format!("{} record has no key", T::KIND)))?;

        if let Some(coll) = self.db.collections.get(T::COLLECTION) {
            coll.remove(&key.to_string());
        }

        Ok(())
    }
}
