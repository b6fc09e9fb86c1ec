//! Group Registry
//!
//! Maps group names to live `Group` instances so that an inbound peer request
//! naming a group can be answered without the caller holding a reference.
//! Groups are added at startup and never removed.

use super::group::{Group, Loader};
use crate::config::GroupConfig;

use dashmap::DashMap;
use std::sync::Arc;

pub struct GroupRegistry {
    groups: DashMap<String, Arc<Group>>,
}

impl GroupRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Builds a group and registers it under `name`.
    ///
    /// An existing group with the same name is replaced.
    pub fn create(
        &self,
        name: &str,
        config: GroupConfig,
        loader: Arc<dyn Loader>,
    ) -> Arc<Group> {
        self.insert(Arc::new(Group::new(name, config, loader)))
    }

    /// Registers an already built group under its own name.
    pub fn insert(&self, group: Arc<Group>) -> Arc<Group> {
        let name = group.name().to_string();
        if self.groups.insert(name.clone(), group.clone()).is_some() {
            tracing::warn!("Replaced existing group: {}", name);
        } else {
            tracing::info!("Registered group: {}", name);
        }
        group
    }

    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    pub fn list_groups(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .groups
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
