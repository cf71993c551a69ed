use crate::registry::AttributeResolver;
use crate::validation::{AttributeSet, ValidationError};

/// Result of a step whose failure is recovered with a default value.
#[derive(Debug)]
pub struct BestEffort<T> {
    pub value: T,
    /// The recovered error, if the step failed.
    pub recovered: Option<ValidationError>,
}

impl<T: Default> BestEffort<T> {
    /// Keep the value on success, fall back to `T::default()` on failure.
    pub fn from_result<E: Into<ValidationError>>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self {
                value,
                recovered: None,
            },
            Err(e) => Self {
                value: T::default(),
                recovered: Some(e.into()),
            },
        }
    }
}

/// Ask the resolver for `user_id`'s attributes; any error yields an empty set.
pub async fn resolve_attributes_or_empty(
    resolver: &dyn AttributeResolver,
    user_id: &str,
) -> BestEffort<AttributeSet> {
    BestEffort::from_result(resolver.attributes_for(user_id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAttributeResolver;

    #[tokio::test]
    async fn test_success_passes_attributes_through() {
        let resolver = MockAttributeResolver::new();
        resolver
            .set_attribute("jdoe", "email", &["jdoe@example.edu"])
            .await;

        let outcome = resolve_attributes_or_empty(&resolver, "jdoe").await;
        assert!(outcome.recovered.is_none());
        assert_eq!(outcome.value["email"], vec!["jdoe@example.edu"]);
    }

    #[tokio::test]
    async fn test_failure_becomes_empty_set() {
        let resolver = MockAttributeResolver::new();
        resolver
            .set_attribute("jdoe", "email", &["jdoe@example.edu"])
            .await;
        resolver.fail_with("directory offline").await;

        let outcome = resolve_attributes_or_empty(&resolver, "jdoe").await;
        assert!(outcome.value.is_empty());
        assert!(matches!(
            outcome.recovered,
            Some(ValidationError::AttributeResolution(_))
        ));
    }
}
