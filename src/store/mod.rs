// hackmate-service/src/store/mod.rs
//
// File-backed document store: one directory per collection, one JSON file
// per document. Provides the two atomic primitives the coordination core
// relies on: insert-if-absent (via create_new) and a locked
// read-modify-write with a persisted version counter.
use crate::models::ServiceError;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub mod connection_store;
pub mod event_store;
pub mod join_request_store;
pub mod profile_store;
pub mod team_store;
pub mod watchlist_store;

// Every stored document carries a version counter so conditional writes
// have something to condition on.
#[derive(Serialize, Deserialize, Debug)]
struct Envelope<T> {
    version: u64,
    data: T,
}

// Per-document lock registry
struct DocLockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocLockRegistry {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, key: &str) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self.locks.lock().map_err(|e| {
            error!("Lock registry poisoned: {:?}", e);
            ServiceError::InternalServerError
        })?;

        Ok(locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

pub struct DocumentStore {
    root: PathBuf,
    locks: DocLockRegistry,
}

impl DocumentStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            locks: DocLockRegistry::new(),
        }
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn doc_path(&self, collection: &str, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", id))
    }

    fn ensure_collection(&self, collection: &str) -> Result<(), ServiceError> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create collection directory {}: {:?}", collection, e);
                ServiceError::StoreUnavailable
            })?;
        }
        Ok(())
    }

    fn serialize<T: Serialize>(envelope: &Envelope<T>) -> Result<String, ServiceError> {
        serde_json::to_string_pretty(envelope).map_err(|e| {
            error!("Failed to serialize document: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    fn read_envelope<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Envelope<T>>, ServiceError> {
        let path = self.doc_path(collection, id);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read document {}/{}: {:?}", collection, id, e);
            ServiceError::StoreUnavailable
        })?;

        let envelope: Envelope<T> = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse document {}/{}: {:?}", collection, id, e);
            ServiceError::InternalServerError
        })?;

        Ok(Some(envelope))
    }

    fn write_envelope<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        envelope: &Envelope<T>,
    ) -> Result<(), ServiceError> {
        let json = Self::serialize(envelope)?;
        fs::write(self.doc_path(collection, id), json).map_err(|e| {
            error!("Failed to write document {}/{}: {:?}", collection, id, e);
            ServiceError::StoreUnavailable
        })
    }

    // Insert a document under a store-assigned id
    pub fn insert<T: Serialize>(&self, collection: &str, value: &T) -> Result<String, ServiceError> {
        let id = Uuid::new_v4().to_string();
        self.ensure_collection(collection)?;
        self.write_envelope(collection, &id, &Envelope { version: 1, data: value })?;
        Ok(id)
    }

    // Insert a document under a caller-derived id. Returns false without
    // touching the store when a document with that id already exists, so a
    // deterministic id turns "query then insert" into one atomic operation.
    // The create and the body write happen under the document lock; a failed
    // write removes the file so the key is not left occupied by a truncated
    // document.
    pub fn insert_with_id<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<bool, ServiceError> {
        self.ensure_collection(collection)?;
        let json = Self::serialize(&Envelope { version: 1, data: value })?;

        let handle = self.locks.lock_for(&format!("{}/{}", collection, id))?;
        let _guard = handle.lock().map_err(|e| {
            error!("Document lock poisoned for {}/{}: {:?}", collection, id, e);
            ServiceError::InternalServerError
        })?;

        let path = self.doc_path(collection, id);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                error!("Failed to create document {}/{}: {:?}", collection, id, e);
                return Err(ServiceError::StoreUnavailable);
            }
        };

        if let Err(e) = file.write_all(json.as_bytes()) {
            error!("Failed to write document {}/{}: {:?}", collection, id, e);
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(ServiceError::StoreUnavailable);
        }

        Ok(true)
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, ServiceError> {
        Ok(self.read_envelope(collection, id)?.map(|env| env.data))
    }

    // Full-collection scan. Unparsable files are skipped with a warning,
    // matching how the directory-scan storage has always behaved.
    pub fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<(String, T)>, ServiceError> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();

        for entry_result in fs::read_dir(&dir).map_err(|e| {
            error!("Failed to read collection directory {}: {:?}", collection, e);
            ServiceError::StoreUnavailable
        })? {
            let entry = entry_result.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::StoreUnavailable
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(|e| {
                error!("Failed to read document file: {:?}", e);
                ServiceError::StoreUnavailable
            })?;

            let envelope: Envelope<T> = match serde_json::from_str(&content) {
                Ok(env) => env,
                Err(e) => {
                    warn!("Skipping unparsable document in {}: {:?}", collection, e);
                    continue;
                }
            };

            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();

            documents.push((id, envelope.data));
        }

        Ok(documents)
    }

    // Read-modify-write under the per-document lock. The closure runs with
    // the lock held; the write and version bump happen only when it
    // succeeds.
    pub fn update_with<T, R, F>(
        &self,
        collection: &str,
        id: &str,
        f: F,
    ) -> Result<R, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Result<R, ServiceError>,
    {
        let handle = self.locks.lock_for(&format!("{}/{}", collection, id))?;
        let _guard = handle.lock().map_err(|e| {
            error!("Document lock poisoned for {}/{}: {:?}", collection, id, e);
            ServiceError::InternalServerError
        })?;

        let mut envelope: Envelope<T> = match self.read_envelope(collection, id)? {
            Some(env) => env,
            None => return Err(ServiceError::NotFound),
        };

        let result = f(&mut envelope.data)?;
        envelope.version += 1;
        self.write_envelope(collection, id, &envelope)?;

        Ok(result)
    }

    // Like update_with, but a missing document starts from `default` instead
    // of failing. Used by the index collections, where absence just means
    // nothing has been recorded for the key yet.
    pub fn upsert_with<T, R, D, F>(
        &self,
        collection: &str,
        id: &str,
        default: D,
        f: F,
    ) -> Result<R, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        D: FnOnce() -> T,
        F: FnOnce(&mut T) -> Result<R, ServiceError>,
    {
        self.ensure_collection(collection)?;

        let handle = self.locks.lock_for(&format!("{}/{}", collection, id))?;
        let _guard = handle.lock().map_err(|e| {
            error!("Document lock poisoned for {}/{}: {:?}", collection, id, e);
            ServiceError::InternalServerError
        })?;

        let mut envelope: Envelope<T> = match self.read_envelope(collection, id)? {
            Some(env) => env,
            None => Envelope { version: 0, data: default() },
        };

        let result = f(&mut envelope.data)?;
        envelope.version += 1;
        self.write_envelope(collection, id, &envelope)?;

        Ok(result)
    }

    // Delete a document. A missing document is not an error.
    pub fn remove(&self, collection: &str, id: &str) -> Result<(), ServiceError> {
        let handle = self.locks.lock_for(&format!("{}/{}", collection, id))?;
        let _guard = handle.lock().map_err(|e| {
            error!("Document lock poisoned for {}/{}: {:?}", collection, id, e);
            ServiceError::InternalServerError
        })?;

        match fs::remove_file(self.doc_path(collection, id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove document {}/{}: {:?}", collection, id, e);
                Err(ServiceError::StoreUnavailable)
            }
        }
    }

    // Overwrite-or-create under the per-document lock, preserving the
    // version counter of an existing document.
    pub fn put<T>(&self, collection: &str, id: &str, value: &T) -> Result<(), ServiceError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.ensure_collection(collection)?;

        let handle = self.locks.lock_for(&format!("{}/{}", collection, id))?;
        let _guard = handle.lock().map_err(|e| {
            error!("Document lock poisoned for {}/{}: {:?}", collection, id, e);
            ServiceError::InternalServerError
        })?;

        let version = self
            .read_envelope::<serde_json::Value>(collection, id)?
            .map(|env| env.version)
            .unwrap_or(0);

        self.write_envelope(collection, id, &Envelope { version: version + 1, data: value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use std::thread;

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct Doc {
        items: Vec<String>,
    }

    fn scratch_store() -> DocumentStore {
        let root = std::env::temp_dir().join(format!("hackmate-store-{}", Uuid::new_v4()));
        DocumentStore::new(root)
    }

    #[test]
    fn insert_with_id_is_first_writer_wins() {
        let store = scratch_store();
        let doc = Doc { items: vec![] };

        assert!(store.insert_with_id("docs", "k1", &doc).unwrap());
        assert!(!store.insert_with_id("docs", "k1", &doc).unwrap());

        let found: Option<Doc> = store.get("docs", "k1").unwrap();
        assert_eq!(found, Some(doc));
    }

    #[test]
    fn concurrent_keyed_inserts_have_one_winner() {
        let store = Arc::new(scratch_store());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                store
                    .insert_with_id("docs", "k1", &Doc { items: vec![format!("writer-{}", i)] })
                    .unwrap()
            }));
        }
        let wins: usize = handles
            .into_iter()
            .map(|handle| handle.join().unwrap() as usize)
            .sum();

        assert_eq!(wins, 1);
        let found: Doc = store.get("docs", "k1").unwrap().unwrap();
        assert_eq!(found.items.len(), 1);
    }

    #[test]
    fn upsert_with_starts_from_default_and_then_updates() {
        let store = scratch_store();

        store
            .upsert_with("docs", "k1", || Doc { items: vec![] }, |doc: &mut Doc| {
                doc.items.push("a".into());
                Ok(())
            })
            .unwrap();
        store
            .upsert_with("docs", "k1", || Doc { items: vec![] }, |doc: &mut Doc| {
                doc.items.push("b".into());
                Ok(())
            })
            .unwrap();

        let found: Doc = store.get("docs", "k1").unwrap().unwrap();
        assert_eq!(found.items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn remove_frees_the_key_for_reinsertion() {
        let store = scratch_store();
        let doc = Doc { items: vec![] };

        assert!(store.insert_with_id("docs", "k1", &doc).unwrap());
        store.remove("docs", "k1").unwrap();
        store.remove("docs", "k1").unwrap();

        assert_eq!(store.get::<Doc>("docs", "k1").unwrap(), None);
        assert!(store.insert_with_id("docs", "k1", &doc).unwrap());
    }

    #[test]
    fn update_with_missing_document_is_not_found() {
        let store = scratch_store();
        let result = store.update_with("docs", "missing", |_: &mut Doc| Ok(()));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn failed_closure_leaves_document_untouched() {
        let store = scratch_store();
        store
            .insert_with_id("docs", "k1", &Doc { items: vec!["a".into()] })
            .unwrap();

        let result: Result<(), ServiceError> = store.update_with("docs", "k1", |doc: &mut Doc| {
            doc.items.push("b".into());
            Err(ServiceError::Conflict("no".to_string()))
        });
        assert!(result.is_err());

        let found: Doc = store.get("docs", "k1").unwrap().unwrap();
        assert_eq!(found.items, vec!["a".to_string()]);
    }

    #[test]
    fn concurrent_updates_do_not_lose_writes() {
        let store = Arc::new(scratch_store());
        store
            .insert_with_id("docs", "k1", &Doc { items: vec![] })
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                store
                    .update_with("docs", "k1", |doc: &mut Doc| {
                        doc.items.push(format!("item-{}", i));
                        Ok(())
                    })
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let found: Doc = store.get("docs", "k1").unwrap().unwrap();
        assert_eq!(found.items.len(), 8);
    }
}
