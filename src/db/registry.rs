//! Explicit collection-name → store registry.
//!
//! Populated once at startup from the configured collection list; request
//! handlers look stores up by the `{collection}` path segment.

use crate::db::traits::ResourceStore;
use crate::db::turso::TursoClient;
use crate::types::{AppError, Result};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct CollectionRegistry {
    stores: HashMap<String, Arc<dyn ResourceStore>>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with one libsql-backed store per name.
    pub fn from_names<I, S>(client: &TursoClient, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.register(Arc::new(client.collection(name.as_ref())));
        }
        registry
    }

    /// Adds a store under its own name, replacing any previous one.
    pub fn register(&mut self, store: Arc<dyn ResourceStore>) {
        let name = store.name().to_string();
        if self.stores.insert(name.clone(), store).is_some() {
            tracing::warn!(collection = %name, "collection registered twice, keeping the last");
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ResourceStore>> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Invalid model".to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_by_name() {
        let client = TursoClient::new_memory().await.expect("memory db");
        let registry = CollectionRegistry::from_names(&client, ["food", "clothes"]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["clothes", "food"]);
        assert_eq!(registry.get("food").expect("food registered").name(), "food");
    }

    #[tokio::test]
    async fn test_unknown_collection_is_not_found() {
        let client = TursoClient::new_memory().await.expect("memory db");
        let registry = CollectionRegistry::from_names(&client, ["food"]);

        assert!(matches!(registry.get("Food"), Err(AppError::NotFound(_))));
        assert!(matches!(registry.get("users"), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_one() {
        let client = TursoClient::new_memory().await.expect("memory db");
        let registry = CollectionRegistry::from_names(&client, ["food", "food"]);

        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
