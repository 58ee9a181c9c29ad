use serde::{Deserialize, Serialize};

/// Stage name that marks a production deployment
pub const PRODUCTION_STAGE: &str = "prod";

/// Check if a deployment stage is production
///
/// Only the exact literal [`PRODUCTION_STAGE`] counts.
pub fn is_production(stage: &str) -> bool {
    stage == PRODUCTION_STAGE
}

/// What happens to a table when its owning stack is torn down
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Keep the table and its data
    Retain,
    /// Delete the table with the stack
    Destroy,
}

impl RemovalPolicy {
    /// Retain production tables, destroy everything else
    pub fn for_stage(stage: &str) -> Self {
        if is_production(stage) {
            RemovalPolicy::Retain
        } else {
            RemovalPolicy::Destroy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_production() {
        assert!(is_production("prod"));
        assert!(!is_production("production"));
        assert!(!is_production("Prod"));
        assert!(!is_production("dev"));
    }

    #[test]
    fn test_removal_policy_for_stage() {
        assert_eq!(RemovalPolicy::for_stage("prod"), RemovalPolicy::Retain);
        assert_eq!(RemovalPolicy::for_stage("staging"), RemovalPolicy::Destroy);
        assert_eq!(RemovalPolicy::for_stage(""), RemovalPolicy::Destroy);
    }

    #[test]
    fn test_removal_policy_serialization() {
        assert_eq!(serde_json::to_value(RemovalPolicy::Retain).unwrap(), "retain");
        let policy: RemovalPolicy = serde_json::from_str("\"destroy\"").unwrap();
        assert_eq!(policy, RemovalPolicy::Destroy);
    }
}
