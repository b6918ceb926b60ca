use std::{collections::BTreeMap, ffi::OsString, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `BTreeMap<K, V>` to a JSON file. Every mutation is written
/// through to disk before the write lock is released, so the file always
/// mirrors the last successful mutation.
pub struct JsonMapStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path.
    ///
    /// A missing file yields an empty map and is created; an existing file
    /// that does not decode is an error.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::storage(parent, e))?;
        }

        let map: BTreeMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| ServiceError::parse(&file_path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::storage(&file_path, e)),
        };
        debug!(path = %file_path.display(), entries = map.len(), "json map store loaded");

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// List all entries as `(key, value)` pairs in key order.
    #[cfg(test)]
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Get value by key.
    #[cfg(test)]
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Look up several keys under one read lock; `None` for absent keys.
    pub async fn get_many<'a, I>(&self, keys: I) -> Vec<Option<V>>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let map = self.inner.read().await;
        keys.into_iter().map(|k| map.get(k).cloned()).collect()
    }

    /// Insert or update a value by key and persist.
    #[cfg(test)]
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.update_map(|m| {
            m.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Apply a mutation to the underlying map and persist.
    ///
    /// The closure runs against a copy; the copy replaces the live map only
    /// once the file has been rewritten, so memory never holds anything the
    /// file does not. The write lock is held throughout, which serializes
    /// concurrent writers.
    pub async fn update_map<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<T, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        write_atomic(&self.file_path, &next).await?;
        *map = next;
        Ok(out)
    }
}

/// Serialize `map` to `<path>.tmp`, then rename it over `path`.
/// The temp file is removed again if either step fails.
async fn write_atomic<M: serde::Serialize>(path: &Path, map: &M) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(map).map_err(|e| ServiceError::parse(path, e))?;
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    if let Err(e) = fs::write(&tmp, data).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(ServiceError::storage(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        warn!(path = %path.display(), error = %e, "snapshot not replaced; in-memory state kept at last persisted version");
        return Err(ServiceError::storage(path, e));
    }
    Ok(())
}
