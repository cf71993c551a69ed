use std::collections::HashMap;

use async_trait::async_trait;

use super::{AttributeError, AttributeResolver};
use crate::validation::AttributeSet;

/// Attribute resolver serving a fixed per-user table.
///
/// Users without an entry get an empty set.
pub struct StaticAttributeResolver {
    attributes: HashMap<String, AttributeSet>,
}

impl StaticAttributeResolver {
    pub fn new(attributes: HashMap<String, AttributeSet>) -> Self {
        Self { attributes }
    }
}

impl Default for StaticAttributeResolver {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl AttributeResolver for StaticAttributeResolver {
    async fn attributes_for(&self, user_id: &str) -> Result<AttributeSet, AttributeError> {
        Ok(self.attributes.get(user_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
