//! 基于 DashMap 的分片存储后端
//!
//! 每个分片一把读写锁，条件插入通过 entry API 在分片写锁内完成。

use super::backend::{AuthKey, KeyStoreBackend};
use crate::error::{SessionError, SessionResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Debug, Default)]
pub struct ShardedBackend {
    keys: DashMap<String, AuthKey>,
}

impl ShardedBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStoreBackend for ShardedBackend {
    fn find(&self, user_id: &str) -> Option<AuthKey> {
        self.keys.get(user_id).map(|entry| entry.value().clone())
    }

    fn save(&self, user_id: &str, key: AuthKey) -> SessionResult<()> {
        self.keys.insert(user_id.to_string(), key);
        Ok(())
    }

    fn insert_if_absent(&self, user_id: &str, key: AuthKey) -> SessionResult<()> {
        match self.keys.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(SessionError::conflict(user_id)),
            Entry::Vacant(slot) => {
                slot.insert(key);
                Ok(())
            }
        }
    }

    fn delete(&self, user_id: &str) -> SessionResult<()> {
        self.keys
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| SessionError::not_found(user_id))
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}
