//! Errors returned by the rebalance calculator.

/// Errors that abort a rebalance calculation.
///
/// Data-quality problems (untargeted holdings, orphaned targets, trades
/// below the minimum size) are not errors; they come back as
/// [`RebalanceWarning`](crate::RebalanceWarning)s on a successful result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RebalanceError {
    /// The requested strategy name is not registered.
    #[error("unknown rebalance strategy: {0}")]
    UnknownStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            RebalanceError::UnknownStrategy("nonexistent".into()).to_string(),
            "unknown rebalance strategy: nonexistent"
        );
    }

    #[test]
    fn is_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(RebalanceError::UnknownStrategy("x".into()));
        assert!(err.to_string().contains("strategy"));
    }
}
