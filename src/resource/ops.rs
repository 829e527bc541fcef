//! Generic CRUD operations, instantiated per record kind
//!
//! Update is read-modify-write with last-write-wins semantics: the full
//! record is read, every non-key field is overwritten, and the full record
//! is written back. There is no version token; concurrent updates to the
//! same key resolve to whichever write lands last.

use tracing::info;

use crate::resource::{ApiError, Params, Resource, ResourceStore};

/// All records of the kind, store natural order
pub async fn list<T: Resource>(store: &dyn ResourceStore<T>) -> Result<Vec<T>, ApiError> {
    Ok(store.find_all().await?)
}

/// Single record by key
pub async fn get<T: Resource>(store: &dyn ResourceStore<T>, key: &T::Key) -> Result<T, ApiError> {
    store
        .find_by_key(key)
        .await?
        .ok_or_else(|| ApiError::not_found(T::KIND, key))
}

/// Create a record from creation parameters, returning the persisted
/// record with its assigned key
pub async fn create<T: Resource>(
    store: &dyn ResourceStore<T>,
    params: &Params,
) -> Result<T, ApiError> {
    let entity = T::from_params(params)?;
    info!(kind = T::KIND, "Creating record");
    Ok(store.save(entity).await?)
}

/// Replace every field of the record with the incoming record's values,
/// preserving the key
pub async fn update<T: Resource>(
    store: &dyn ResourceStore<T>,
    key: &T::Key,
    incoming: T,
) -> Result<T, ApiError> {
    let mut existing = get(store, key).await?;
    existing.merge_from(incoming);
    Ok(store.save(existing).await?)
}

/// Delete the record, returning the confirmation message
pub async fn delete<T: Resource>(
    store: &dyn ResourceStore<T>,
    key: &T::Key,
) -> Result<String, ApiError> {
    let existing = get(store, key).await?;
    store.delete(&existing).await?;
    Ok(format!("{} with id {} deleted", T::KIND, key))
}
