//! Element resolution strategies
//!
//! Each strategy turns a slot id into one host query. Strategies are
//! independent; a failing query never affects the next one in the chain.

use crate::{
    errors::LocatorError,
    ports::ElementLookup,
    types::{ElementQuery, LocatorStrategy, DATA_ADUNIT_CODE, DATA_AD_UNIT},
};
use stretch_core_types::ElementRef;
use tracing::debug;

impl LocatorStrategy {
    /// Build the host query this strategy issues for `slot_id`
    pub fn query_for(&self, slot_id: &str) -> ElementQuery {
        let value = slot_id.to_string();
        match self {
            LocatorStrategy::ExactId => ElementQuery::ById { id: value },
            LocatorStrategy::IdAttribute => ElementQuery::AttributeEquals {
                name: "id".to_string(),
                value,
            },
            LocatorStrategy::DataAdUnitCode => ElementQuery::AttributeEquals {
                name: DATA_ADUNIT_CODE.to_string(),
                value,
            },
            LocatorStrategy::DataAdUnit => ElementQuery::AttributeEquals {
                name: DATA_AD_UNIT.to_string(),
                value,
            },
            LocatorStrategy::IdContains => ElementQuery::AttributeContains {
                name: "id".to_string(),
                value,
            },
            LocatorStrategy::ClassContains => ElementQuery::AttributeContains {
                name: "class".to_string(),
                value,
            },
        }
    }

    /// Run this strategy against the host
    pub fn run(
        &self,
        lookup: &dyn ElementLookup,
        slot_id: &str,
    ) -> Result<Option<ElementRef>, LocatorError> {
        let query = self.query_for(slot_id);
        debug!(
            strategy = self.name(),
            selector = %query.to_selector(),
            "Trying locator strategy"
        );
        lookup
            .query(&query)
            .map_err(|err| LocatorError::StrategyFailed {
                strategy: self.name().to_string(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LookupError;

    struct Rejecting;

    impl ElementLookup for Rejecting {
        fn query(&self, query: &ElementQuery) -> Result<Option<ElementRef>, LookupError> {
            Err(LookupError::Unsupported(query.to_selector()))
        }
    }

    #[test]
    fn test_locator_strategy() {
        assert_eq!(LocatorStrategy::ExactId.name(), "exact-id");
        assert_eq!(LocatorStrategy::DataAdUnitCode.name(), "data-adunit-code");
        assert_eq!(LocatorStrategy::ClassContains.name(), "class-contains");
    }

    #[test]
    fn test_fallback_chain() {
        let chain = LocatorStrategy::fallback_chain();
        assert_eq!(chain.len(), 6);
        assert_eq!(chain[0], LocatorStrategy::ExactId);
        assert_eq!(chain[1], LocatorStrategy::IdAttribute);
        assert_eq!(chain[2], LocatorStrategy::DataAdUnitCode);
        assert_eq!(chain[3], LocatorStrategy::DataAdUnit);
        assert_eq!(chain[4], LocatorStrategy::IdContains);
        assert_eq!(chain[5], LocatorStrategy::ClassContains);
    }

    #[test]
    fn test_query_for_slot() {
        assert_eq!(
            LocatorStrategy::DataAdUnit.query_for("ad-1").to_selector(),
            "[data-ad-unit=\"ad-1\"]"
        );
        assert_eq!(
            LocatorStrategy::IdAttribute.query_for("ad-1").to_selector(),
            "[id=\"ad-1\"]"
        );
        assert_eq!(
            LocatorStrategy::IdContains.query_for("ad-1"),
            ElementQuery::AttributeContains {
                name: "id".to_string(),
                value: "ad-1".to_string(),
            }
        );
    }

    #[test]
    fn test_host_error_maps_to_strategy_failure() {
        let err = LocatorStrategy::ClassContains
            .run(&Rejecting, "ad-1")
            .unwrap_err();
        match err {
            LocatorError::StrategyFailed { strategy, reason } => {
                assert_eq!(strategy, "class-contains");
                assert!(reason.contains("[class*=\"ad-1\"]"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
