use std::collections::BTreeMap;
use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::StoreError;
use crate::window::Window;

const EXTENSION: &str = ".json";

/// Generic directory-backed store of named entries.
///
/// Each entry is one file named `<prefix><name>.json` inside the store's
/// directory. Stripping the prefix and extension from a filename recovers the
/// entry name exactly; files that do not carry both are ignored. Enumeration
/// order is lexicographic byte order over filenames. Callers rely on it as
/// the stable pagination order, so it is a contract, not an accident.
///
/// The store holds no state besides the directory and performs no locking:
/// concurrent writes to the same name are last-writer-wins, and enumeration
/// takes no snapshot against concurrent writers.
pub struct FileStore<T> {
    dir: PathBuf,
    prefix: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for FileStore<T> {
    fn clone(&self) -> Self {
        Self { dir: self.dir.clone(), prefix: self.prefix.clone(), _marker: PhantomData }
    }
}

impl<T> FileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open a store rooted at `dir`, creating the directory if missing.
    pub async fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Io(format!("failed to create {}: {}", dir.display(), e)))?;
        Ok(Self { dir, prefix: prefix.into(), _marker: PhantomData })
    }

    fn file_name(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, EXTENSION)
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(self.file_name(name))
    }

    fn entry_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name.strip_prefix(self.prefix.as_str())?.strip_suffix(EXTENSION)
    }

    /// Read and deserialize the entry for `name`.
    pub async fn get(&self, name: &str) -> Result<T, StoreError> {
        let path = self.entry_path(name);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            Err(e) => return Err(StoreError::Io(format!("failed to open {}: {}", path.display(), e))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Decode(format!("failed to decode {}: {}", self.file_name(name), e)))
    }

    /// Serialize `value` and (over)write the entry for `name`.
    ///
    /// Writes to a dot-prefixed temp file in the same directory and renames it
    /// over the destination, so concurrent readers never observe a
    /// half-written entry.
    pub async fn set(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| StoreError::Encode(format!("failed to encode {}: {}", self.file_name(name), e)))?;
        let tmp = self.dir.join(format!(".{}.tmp", self.file_name(name)));
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Io(format!("failed to write {}: {}", tmp.display(), e)))?;
        let path = self.entry_path(name);
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io(format!("failed to rename {} to {}: {}", tmp.display(), path.display(), e)))
    }

    /// Remove the entry for `name`. Deleting an absent entry is `NotFound`,
    /// not a no-op.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.entry_path(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(StoreError::Io(format!("failed to remove {}: {}", path.display(), e))),
        }
    }

    /// Enumerate entry names within `window`, sorted by filename.
    ///
    /// Never fails: directory-read errors yield an empty (or partial) listing
    /// instead of surfacing. `get_all` fails hard on the same class of error;
    /// the asymmetry is inherited behavior that callers depend on.
    pub async fn names(&self, window: Window) -> Vec<String> {
        let files = match self.walk().await {
            Ok(files) => files,
            Err(_) => return Vec::new(),
        };
        files
            .iter()
            .skip(window.offset)
            .take(window.limit.unwrap_or(usize::MAX))
            .filter_map(|f| self.entry_name(f).map(str::to_owned))
            .collect()
    }

    /// Read and deserialize all entries within `window`, keyed by name.
    ///
    /// All-or-nothing: a single entry that fails to open or decode aborts the
    /// whole call with that entry's error, even when every other entry in the
    /// window is valid.
    pub async fn get_all(&self, window: Window) -> Result<BTreeMap<String, T>, StoreError> {
        let files = self.walk().await?;
        let mut entries = BTreeMap::new();
        for file_name in files
            .into_iter()
            .skip(window.offset)
            .take(window.limit.unwrap_or(usize::MAX))
        {
            let path = self.dir.join(&file_name);
            let bytes = fs::read(&path)
                .await
                .map_err(|e| StoreError::Io(format!("failed to open {}: {}", path.display(), e)))?;
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Decode(format!("failed to decode {}: {}", file_name, e)))?;
            if let Some(name) = self.entry_name(&file_name) {
                entries.insert(name.to_owned(), value);
            }
        }
        Ok(entries)
    }

    /// Single flat pass over the store directory: subdirectories and files
    /// without this store's prefix/extension are skipped and never count
    /// against a window. Returns matching filenames in byte order.
    async fn walk(&self) -> Result<Vec<String>, StoreError> {
        let mut dir = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::Io(format!("failed to scan {}: {}", self.dir.display(), e)))?;
        let mut files = Vec::new();
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return Err(StoreError::Io(format!("failed to scan {}: {}", self.dir.display(), e))),
            };
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::Io(format!("failed to scan {}: {}", self.dir.display(), e)))?;
            if file_type.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else { continue };
            if !file_name.starts_with(self.prefix.as_str()) || !file_name.ends_with(EXTENSION) {
                continue;
            }
            files.push(file_name.to_owned());
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Target {
        url: String,
        weight: u32,
    }

    fn target(url: &str) -> Target {
        Target { url: url.to_string(), weight: 1 }
    }

    fn temp_store_dir() -> PathBuf {
        std::env::temp_dir().join(format!("entry_store_{}", Uuid::new_v4()))
    }

    async fn store_with(names: &[&str]) -> Result<(FileStore<Target>, PathBuf), anyhow::Error> {
        let dir = temp_store_dir();
        let store = FileStore::<Target>::new(&dir, "router_").await?;
        for name in names {
            store.set(name, &target(&format!("http://{}.internal", name))).await?;
        }
        Ok((store, dir))
    }

    #[tokio::test]
    async fn set_then_get_round_trips() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&[]).await?;
        let value = target("http://orders.internal");
        store.set("orders", &value).await?;
        assert_eq!(store.get("orders").await?, value);

        // overwrite replaces the whole value
        let replaced = Target { url: "http://orders-v2.internal".into(), weight: 7 };
        store.set("orders", &replaced).await?;
        assert_eq!(store.get("orders").await?, replaced);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_entry_is_not_found() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&[]).await?;
        assert!(matches!(store.get("absent").await, Err(StoreError::NotFound(_))));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_visible_and_not_idempotent() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&["orders"]).await?;
        store.delete("orders").await?;
        assert!(matches!(store.get("orders").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("orders").await, Err(StoreError::NotFound(_))));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn names_pagination_is_deterministic() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&["a", "b", "c"]).await?;
        assert_eq!(store.names(Window::new(0, 2)).await, vec!["a", "b"]);
        assert_eq!(store.names(Window::unbounded(1)).await, vec!["b", "c"]);
        assert_eq!(store.names(Window::new(5, 10)).await, Vec::<String>::new());
        assert_eq!(store.names(Window::new(1, 0)).await, Vec::<String>::new());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn get_all_fails_on_single_corrupt_entry() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&["a", "b", "c"]).await?;
        tokio::fs::write(dir.join("router_zz.json"), b"{not json").await?;

        let err = store.get_all(Window::unbounded(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(err.to_string().contains("router_zz.json"));

        // a window excluding the corrupt entry still succeeds
        let page = store.get_all(Window::new(0, 3)).await?;
        assert_eq!(page.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn foreign_files_are_excluded_from_window_accounting() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&["a", "b"]).await?;
        // sorts before every router_ file, must not consume the offset
        tokio::fs::write(dir.join("README.json"), b"{}").await?;
        tokio::fs::write(dir.join("service_x.json"), b"{}").await?;
        tokio::fs::create_dir(dir.join("router_nested.json.d")).await?;

        assert_eq!(store.names(Window::unbounded(0)).await, vec!["a", "b"]);
        assert_eq!(store.names(Window::new(1, 1)).await, vec!["b"]);
        let all = store.get_all(Window::unbounded(0)).await?;
        assert_eq!(all.len(), 2);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_creates_directory_and_lists_empty() -> Result<(), anyhow::Error> {
        let dir = temp_store_dir().join("nested").join("routers");
        let store = FileStore::<Target>::new(&dir, "router_").await?;
        assert!(tokio::fs::metadata(&dir).await.is_ok());
        assert_eq!(store.names(Window::unbounded(0)).await, Vec::<String>::new());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn ordering_follows_filename_bytes() -> Result<(), anyhow::Error> {
        // "a" < "a-1" as names, but "router_a-1.json" < "router_a.json" as
        // filenames ('-' sorts before '.'); the filename order wins.
        let (store, dir) = store_with(&["a", "a-1"]).await?;
        assert_eq!(store.names(Window::unbounded(0)).await, vec!["a-1", "a"]);
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_sets_to_distinct_names_both_land() -> Result<(), anyhow::Error> {
        let (store, dir) = store_with(&[]).await?;
        let alpha_target = target("http://alpha.internal");
        let beta_target = target("http://beta.internal");
        let (a, b) = tokio::join!(
            store.set("alpha", &alpha_target),
            store.set("beta", &beta_target),
        );
        a?;
        b?;
        assert_eq!(store.get("alpha").await?.url, "http://alpha.internal");
        assert_eq!(store.get("beta").await?.url, "http://beta.internal");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
