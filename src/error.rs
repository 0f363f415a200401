//! Error types for the fluent builder layer

use thiserror::Error;

use crate::model::ModelError;

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Builder, profile and assembly errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Feature '{feature}' is not supported by profile {profile}")]
    FeatureNotSupported { feature: String, profile: String },

    #[error("Invalid combination: {0}")]
    InvalidCombination(String),

    #[error("Missing required field '{field}' on {node}")]
    RequiredMissing { node: String, field: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("No active profile: call ProfileContext::set_default() or pass a profile explicitly")]
    NoActiveProfile,

    #[error("Profile stack is empty: pop() without a matching push()")]
    ProfileStackEmpty,

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid profile definition: {0}")]
    InvalidProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}

impl BuildError {
    pub fn feature(node_type: &str, key: &str, profile: &str) -> Self {
        Self::FeatureNotSupported {
            feature: format!("{}.{}", node_type, key),
            profile: profile.to_string(),
        }
    }

    pub fn because(reason: impl Into<String>) -> Self {
        Self::InvalidCombination(reason.into())
    }

    pub fn required(node: &str, field: &str) -> Self {
        Self::RequiredMissing {
            node: node.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_message_names_node_key_and_profile() {
        let err = BuildError::feature("Widget", "foo", "1.0");
        assert_eq!(
            err.to_string(),
            "Feature 'Widget.foo' is not supported by profile 1.0"
        );
    }

    #[test]
    fn test_required_message() {
        let err = BuildError::required("Operation", "responses");
        assert_eq!(err.to_string(), "Missing required field 'responses' on Operation");
    }
}
