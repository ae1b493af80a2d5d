use thiserror::Error;

/// Boxed error reported by a provider's factory.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`Container`](crate::Container) registration and resolution.
///
/// None of these are retried or recovered from internally; every failure is
/// returned to the immediate caller.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A provider is already registered under this key. The existing provider is untouched.
    #[error("Duplicate registration for key: {key}")]
    DuplicateRegistration { key: String },

    /// No provider is registered under this key.
    #[error("Provider not found for key: {key}")]
    ProviderNotFound { key: String },

    /// The provider produced a value that is not the requested type.
    #[error("Type mismatch for key {key}: expected {expected}, found {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// The factory itself failed.
    #[error("{0}")]
    Factory(#[source] FactoryError),
}

impl ContainerError {
    /// Wraps an arbitrary error reported by a factory.
    ///
    /// ```
    /// use inject_container::ContainerError;
    ///
    /// let err = ContainerError::factory(std::io::Error::other("database offline"));
    /// assert_eq!(err.to_string(), "database offline");
    /// ```
    pub fn factory(err: impl Into<FactoryError>) -> Self {
        ContainerError::Factory(err.into())
    }

    /// The provider key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ContainerError::DuplicateRegistration { key }
            | ContainerError::ProviderNotFound { key }
            | ContainerError::TypeMismatch { key, .. } => Some(key),
            ContainerError::Factory(_) => None,
        }
    }
}

impl PartialEq for ContainerError {
    fn eq(&self, other: &Self) -> bool {
        use ContainerError::*;

        match (self, other) {
            (DuplicateRegistration { key: a }, DuplicateRegistration { key: b }) => a == b,
            (ProviderNotFound { key: a }, ProviderNotFound { key: b }) => a == b,
            (
                TypeMismatch {
                    key: k1,
                    expected: e1,
                    actual: a1,
                },
                TypeMismatch {
                    key: k2,
                    expected: e2,
                    actual: a2,
                },
            ) => k1 == k2 && e1 == e2 && a1 == a2,
            // factory errors are opaque, compare what the caller would see
            (Factory(a), Factory(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_display() {
        let err = ContainerError::DuplicateRegistration {
            key: "TestService".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate registration for key: TestService"
        );
    }

    #[test]
    fn test_provider_not_found_display() {
        let err = ContainerError::ProviderNotFound {
            key: "TestService".into(),
        };
        assert_eq!(err.to_string(), "Provider not found for key: TestService");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = ContainerError::TypeMismatch {
            key: "custom-key".into(),
            expected: "String".into(),
            actual: "Arc<dyn TestService>".into(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch for key custom-key: expected String, found Arc<dyn TestService>"
        );
    }

    #[test]
    fn test_factory_error_keeps_message() {
        let err = ContainerError::factory("connection refused");
        assert_eq!(err.to_string(), "connection refused");
        assert!(err.key().is_none());
    }

    #[test]
    fn test_key_accessor() {
        let err = ContainerError::ProviderNotFound { key: "db".into() };
        assert_eq!(err.key(), Some("db"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            ContainerError::ProviderNotFound { key: "a".into() },
            ContainerError::ProviderNotFound { key: "a".into() }
        );
        assert_ne!(
            ContainerError::ProviderNotFound { key: "a".into() },
            ContainerError::DuplicateRegistration { key: "a".into() }
        );
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &ContainerError::ProviderNotFound { key: "x".into() };
        assert_eq!(err.to_string(), "Provider not found for key: x");
    }
}
