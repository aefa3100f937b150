//! Collection store gateway.
//!
//! A thin accessor over the named document collections. The production
//! implementation talks to MongoDB; tests substitute an in-memory double
//! behind the same trait.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Database;

use crate::errors::AppError;

/// Collection names.
pub const USUARIOS: &str = "usuarios";
pub const MIEMBROS: &str = "miembros";
pub const NOTIFICACIONES: &str = "notificaciones";

/// Narrow contract over the document store: per-collection fetch-all,
/// fetch-by-id, equality query, insert, partial update, and delete.
///
/// Callers are responsible for existence checks; `update_by_id` and
/// `delete_by_id` are no-ops when the id matches nothing.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, AppError>;

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, AppError>;

    /// Insert a document and return the store-assigned id.
    async fn insert(&self, collection: &str, fields: Document) -> Result<String, AppError>;

    /// Overwrite only the given fields of the document at `id`.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), AppError>;

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), AppError>;
}

/// MongoDB-backed gateway.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl CollectionStore for MongoStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, AppError> {
        let mut cursor = self.collection(collection).find(doc! {}).await?;
        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            docs.push(split_id(doc));
        }
        Ok(docs)
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let doc = self
            .collection(collection)
            .find_one(doc! { "_id": oid })
            .await?;
        Ok(doc.map(|d| split_id(d).1))
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, AppError> {
        let mut filter = Document::new();
        filter.insert(field, value);

        let mut cursor = self.collection(collection).find(filter).await?;
        let mut docs = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            docs.push(split_id(doc));
        }
        Ok(docs)
    }

    async fn insert(&self, collection: &str, fields: Document) -> Result<String, AppError> {
        let result = self.collection(collection).insert_one(fields).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| result.inserted_id.to_string());
        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(());
        };
        self.collection(collection)
            .update_one(doc! { "_id": oid }, doc! { "$set": fields })
            .await?;
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(());
        };
        self.collection(collection)
            .delete_one(doc! { "_id": oid })
            .await?;
        Ok(())
    }
}

/// Ids are opaque to clients; a string that is not a valid ObjectId can
/// never match a stored document.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// Pull the store-internal `_id` out of a fetched document.
fn split_id(mut doc: Document) -> (String, Document) {
    let id = match doc.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    (id, doc)
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory stand-in for the document store, used by tests.

    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        collections: Mutex<BTreeMap<String, Vec<(String, Document)>>>,
        next_id: AtomicUsize,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of insert/update/delete calls seen so far.
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CollectionStore for MemoryStore {
        async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, AppError> {
            let colls = self.collections.lock().unwrap();
            Ok(colls.get(collection).cloned().unwrap_or_default())
        }

        async fn get_by_id(
            &self,
            collection: &str,
            id: &str,
        ) -> Result<Option<Document>, AppError> {
            let colls = self.collections.lock().unwrap();
            Ok(colls
                .get(collection)
                .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id.as_str() == id))
                .map(|(_, doc)| doc.clone()))
        }

        async fn find_eq(
            &self,
            collection: &str,
            field: &str,
            value: &str,
        ) -> Result<Vec<(String, Document)>, AppError> {
            let colls = self.collections.lock().unwrap();
            Ok(colls
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|(_, doc)| {
                            doc.get_str(field).map(|v| v == value).unwrap_or(false)
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn insert(&self, collection: &str, fields: Document) -> Result<String, AppError> {
            let id = format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut colls = self.collections.lock().unwrap();
            colls
                .entry(collection.to_string())
                .or_default()
                .push((id.clone(), fields));
            Ok(id)
        }

        async fn update_by_id(
            &self,
            collection: &str,
            id: &str,
            fields: Document,
        ) -> Result<(), AppError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut colls = self.collections.lock().unwrap();
            if let Some(docs) = colls.get_mut(collection) {
                if let Some((_, doc)) = docs.iter_mut().find(|(doc_id, _)| doc_id.as_str() == id) {
                    for (key, value) in fields {
                        doc.insert(key, value);
                    }
                }
            }
            Ok(())
        }

        async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), AppError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut colls = self.collections.lock().unwrap();
            if let Some(docs) = colls.get_mut(collection) {
                docs.retain(|(doc_id, _)| doc_id.as_str() != id);
            }
            Ok(())
        }
    }
}
