//! The group collection, stored as one JSON array under [`GROUPS_KEY`].
//!
//! Every write is a read-modify-write of the whole array. There is no
//! locking: a single writer (the running app) is assumed, and two processes
//! writing at once can lose an update.

use super::database::KeyValueStore;
use crate::error::{Result, StoreError};
use crate::group::Group;

pub const GROUPS_KEY: &str = "groups";

pub struct GroupStore<S> {
    kv: S,
}

impl<S: KeyValueStore> GroupStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// All groups in creation order.
    ///
    /// Never fails: a read or parse error is logged and reported as an
    /// empty collection.
    pub fn load_all(&self) -> Vec<Group> {
        match self.read() {
            Ok(groups) => groups,
            Err(err) => {
                tracing::warn!(error = %err, "could not load groups; treating as empty");
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<Group> {
        self.load_all().into_iter().find(|g| g.id == id)
    }

    /// Add `group` at the end of the collection.
    ///
    /// # Errors
    /// Fails if the stored collection is unreadable (it is left untouched)
    /// or the rewrite fails.
    pub fn append(&self, group: Group) -> Result<()> {
        let mut groups = self.read()?;
        tracing::info!(id = %group.id, name = %group.name, "saving group");
        groups.push(group);
        self.write(&groups)
    }

    /// Remove the group with `id`. Returns whether anything was removed;
    /// an unknown id is not an error and leaves the collection as is.
    ///
    /// # Errors
    /// Fails if the stored collection is unreadable or the rewrite fails.
    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut groups = self.read()?;
        let before = groups.len();
        groups.retain(|g| g.id != id);
        if groups.len() == before {
            tracing::debug!(%id, "delete: no such group");
            return Ok(false);
        }
        self.write(&groups)?;
        tracing::info!(%id, "deleted group");
        Ok(true)
    }

    fn read(&self) -> Result<Vec<Group>> {
        match self.kv.get(GROUPS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| {
                StoreError::Malformed {
                    key: GROUPS_KEY.to_string(),
                    source,
                }
                .into()
            }),
        }
    }

    fn write(&self, groups: &[Group]) -> Result<()> {
        let raw = serde_json::to_string(groups).map_err(|source| StoreError::Malformed {
            key: GROUPS_KEY.to_string(),
            source,
        })?;
        self.kv.set(GROUPS_KEY, &raw)?;
        Ok(())
    }
}
