//! Mock attribute resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::registry::{AttributeError, AttributeResolver};
use crate::validation::AttributeSet;

/// Mock implementation of the AttributeResolver trait.
#[derive(Debug, Clone, Default)]
pub struct MockAttributeResolver {
    attributes: Arc<RwLock<HashMap<String, AttributeSet>>>,
    /// If set, every lookup fails as unavailable with this message.
    failure: Arc<RwLock<Option<String>>>,
    lookups: Arc<RwLock<Vec<String>>>,
}

impl MockAttributeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one attribute for a user, replacing earlier values.
    pub async fn set_attribute(&self, user_id: &str, name: &str, values: &[&str]) {
        self.attributes
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(
                name.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            );
    }

    pub async fn fail_with(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    /// Users looked up so far.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl AttributeResolver for MockAttributeResolver {
    async fn attributes_for(&self, user_id: &str) -> Result<AttributeSet, AttributeError> {
        self.lookups.write().await.push(user_id.to_string());
        if let Some(message) = self.failure.read().await.clone() {
            return Err(AttributeError::Unavailable(message));
        }
        Ok(self
            .attributes
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
