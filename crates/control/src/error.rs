use repodeck_core::error::CoreError;
use repodeck_hosting::HostingError;

/// Errors from control plane operations.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Hosting(#[from] HostingError),

    #[error("Registry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ControlError {
    /// Whether the failure means the target does not exist, either in the
    /// domain (missing registry entry, missing branch) or on the platform.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Core(CoreError::NotFound { .. }) => true,
            Self::Hosting(e) => e.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_both_layers() {
        let core: ControlError = CoreError::NotFound {
            entity: "Branch",
            key: "main".into(),
        }
        .into();
        let hosting: ControlError = HostingError::not_found("repository a/b").into();
        let validation: ControlError = CoreError::Validation("bad".into()).into();

        assert!(core.is_not_found());
        assert!(hosting.is_not_found());
        assert!(!validation.is_not_found());
    }

    #[test]
    fn core_message_is_passed_through() {
        let err: ControlError = CoreError::NotFound {
            entity: "Branch",
            key: "main".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Entity not found: Branch 'main'");
    }
}
