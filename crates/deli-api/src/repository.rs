//! # Entity Repository
//!
//! Generic list/create/update/remove over one REST resource.
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | `list`    | GET    | `/{resource}` |
//! | `create`  | POST   | `/{resource}` |
//! | `update`  | PUT    | `/{resource}/{id}` |
//! | `remove`  | DELETE | `/{resource}/{id}` |
//!
//! Every successful mutation invalidates the resource's query cache entry.
//! Callers reload the list afterwards; nothing is patched in place.

use reqwest::Method;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use deli_core::{Entity, RecordId};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// What the backend answered to a create or update.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationAck<E> {
    /// The stored record, as echoed back.
    Record(E),
    /// A 2xx with an empty body or a body that is not a record.
    Acknowledged,
}

impl<E> MutationAck<E> {
    pub fn into_record(self) -> Option<E> {
        match self {
            MutationAck::Record(record) => Some(record),
            MutationAck::Acknowledged => None,
        }
    }
}

/// Repository for one resource.
///
/// ## Usage
/// ```rust,ignore
/// let customers = client.repository::<Customer>();
///
/// let all = customers.list().await?;
/// customers.create(&payload).await?;
/// customers.remove(7).await?;
/// ```
pub struct Repository<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Repository {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("resource", &std::any::type_name::<E>())
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl<E: Entity> Repository<E> {
    pub(crate) fn new(client: ApiClient) -> Self {
        Repository {
            client,
            _entity: PhantomData,
        }
    }

    /// Fetches the whole collection and refreshes the cache entry.
    ///
    /// The cache is left alone if a mutation invalidated it while the
    /// request was in flight.
    pub async fn list(&self) -> ApiResult<Vec<E>> {
        let endpoint = format!("GET /{}", E::RESOURCE);
        debug!(resource = E::RESOURCE, "Listing records");

        let cache = self.client.cache();
        let generation = cache.generation(E::RESOURCE).await;
        let records: Vec<E> = self
            .client
            .send_json(&endpoint, self.client.request(Method::GET, E::RESOURCE))
            .await?;

        debug!(resource = E::RESOURCE, count = records.len(), "List returned records");
        cache
            .insert_if_current(E::RESOURCE, generation, Arc::new(records.clone()))
            .await;

        Ok(records)
    }

    /// The cached collection, fetched on a miss.
    pub async fn cached(&self) -> ApiResult<Arc<Vec<E>>> {
        self.client
            .cache()
            .get_or_fetch(E::RESOURCE, || self.fetch_uncached())
            .await
    }

    async fn fetch_uncached(&self) -> ApiResult<Vec<E>> {
        let endpoint = format!("GET /{}", E::RESOURCE);
        self.client
            .send_json(&endpoint, self.client.request(Method::GET, E::RESOURCE))
            .await
    }

    /// Creates a record.
    pub async fn create(&self, payload: &E::Payload) -> ApiResult<MutationAck<E>> {
        let endpoint = format!("POST /{}", E::RESOURCE);
        debug!(resource = E::RESOURCE, "Creating record");

        let request = self.client.request(Method::POST, E::RESOURCE).json(payload);
        let body = self.client.send(&endpoint, request).await?;
        self.client.cache().invalidate(E::RESOURCE).await;

        Ok(decode_ack(&endpoint, &body))
    }

    /// Replaces a record.
    pub async fn update(&self, id: RecordId, payload: &E::Payload) -> ApiResult<MutationAck<E>> {
        let endpoint = format!("PUT /{}/{id}", E::RESOURCE);
        debug!(resource = E::RESOURCE, id = %id, "Updating record");

        let path = format!("{}/{id}", E::RESOURCE);
        let request = self.client.request(Method::PUT, &path).json(payload);
        let body = self.client.send(&endpoint, request).await?;
        self.client.cache().invalidate(E::RESOURCE).await;

        Ok(decode_ack(&endpoint, &body))
    }

    /// Deletes a record. A 404 for an unknown id is an error.
    pub async fn remove(&self, id: RecordId) -> ApiResult<()> {
        let endpoint = format!("DELETE /{}/{id}", E::RESOURCE);
        debug!(resource = E::RESOURCE, id = %id, "Deleting record");

        let path = format!("{}/{id}", E::RESOURCE);
        self.client
            .send(&endpoint, self.client.request(Method::DELETE, &path))
            .await?;
        self.client.cache().invalidate(E::RESOURCE).await;

        Ok(())
    }
}

fn decode_ack<E: Entity>(endpoint: &str, body: &[u8]) -> MutationAck<E> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return MutationAck::Acknowledged;
    }
    match serde_json::from_slice::<E>(body) {
        Ok(record) => MutationAck::Record(record),
        Err(e) => {
            debug!(endpoint, error = %e, "Mutation answer is not a record");
            MutationAck::Acknowledged
        }
    }
}
