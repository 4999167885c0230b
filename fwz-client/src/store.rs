//! SessionStore - 本地会话存储
//!
//! 登录成功后保存 token 与商户信息，其他页面按 key 读取。
//! 底层是一个简单的 key-value 存储：内存版用于测试，文件版把所有 key
//! 写进一个 JSON 对象文件。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use shared::models::{
    KEY_ACCESS_TOKEN, KEY_MERCHANT_ID, KEY_TENANT_ID, KEY_USER_ID, SESSION_KEYS, Session,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key-value storage
///
/// `write_batch` is atomic: either every set and removal is visible
/// afterwards or none is.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn write_batch(&self, set: &[(&str, String)], remove: &[&str]) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;

    fn set_many(&self, pairs: &[(&str, String)]) -> StoreResult<()> {
        self.write_batch(pairs, &[])
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn write_batch(&self, set: &[(&str, String)], remove: &[&str]) -> StoreResult<()> {
        (**self).write_batch(set, remove)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

fn apply_batch(data: &mut BTreeMap<String, String>, set: &[(&str, String)], remove: &[&str]) {
    for key in remove {
        data.remove(*key);
    }
    for (key, value) in set {
        data.insert((*key).to_string(), value.clone());
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn write_batch(&self, set: &[(&str, String)], remove: &[&str]) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        apply_batch(&mut data, set, remove);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        data.remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        data.clear();
        Ok(())
    }
}

/// 文件存储: `{dir}/session.json`
///
/// 每次写入先写临时文件再 rename，写入失败时旧文件保持不变。
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "session.json";

    /// 打开存储文件，不存在时视为空
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let path = dir.as_ref().join(Self::FILE_NAME);
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = data.len(), "Session store opened");
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `change` to a copy; memory is only updated once the file is written
    fn update<F>(&self, change: F) -> StoreResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = data.clone();
        change(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn write_batch(&self, set: &[(&str, String)], remove: &[&str]) -> StoreResult<()> {
        self.update(|data| apply_batch(data, set, remove))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|data| {
            data.remove(key);
        })
    }

    fn clear(&self) -> StoreResult<()> {
        self.update(|data| data.clear())
    }
}

/// Typed view of the session keys
pub struct SessionStore<S: KeyValueStore = JsonFileStore> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Write the login result in one batch. Keys the login did not return
    /// are removed in the same batch so nothing from an earlier account
    /// survives, even when the write fails halfway.
    pub fn save(&self, session: &Session) -> StoreResult<()> {
        let pairs = session.to_pairs();
        let stale: Vec<&str> = SESSION_KEYS
            .iter()
            .copied()
            .filter(|key| !pairs.iter().any(|(k, _)| k == key))
            .collect();
        self.store.write_batch(&pairs, &stale)?;
        tracing::debug!(keys = pairs.len(), removed = stale.len(), "Session saved");
        Ok(())
    }

    /// `None` when no access token is stored
    pub fn load(&self) -> StoreResult<Option<Session>> {
        let mut failure = None;
        let session = Session::from_lookup(|key| match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                failure.get_or_insert(e);
                None
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(session),
        }
    }

    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.store.get(key)
    }

    pub fn access_token(&self) -> StoreResult<Option<String>> {
        Ok(self.store.get(KEY_ACCESS_TOKEN)?.filter(|t| !t.is_empty()))
    }

    pub fn merchant_id(&self) -> StoreResult<Option<i64>> {
        self.get_i64(KEY_MERCHANT_ID)
    }

    pub fn tenant_id(&self) -> StoreResult<Option<i64>> {
        self.get_i64(KEY_TENANT_ID)
    }

    pub fn user_id(&self) -> StoreResult<Option<i64>> {
        self.get_i64(KEY_USER_ID)
    }

    /// Home overwrites the merchant id with the one from the terminal detail
    pub fn set_merchant_id(&self, merchant_id: i64) -> StoreResult<()> {
        self.store
            .set_many(&[(KEY_MERCHANT_ID, merchant_id.to_string())])
    }

    /// 退出登录 / 会话过期
    pub fn clear(&self) -> StoreResult<()> {
        self.store.clear()?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn remove_access_token(&self) -> StoreResult<()> {
        self.store.remove(KEY_ACCESS_TOKEN)
    }

    fn get_i64(&self, key: &str) -> StoreResult<Option<i64>> {
        Ok(self
            .store
            .get(key)?
            .and_then(|v| v.trim().parse::<i64>().ok()))
    }
}
