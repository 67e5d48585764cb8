//! Slot resolver with fallback chain orchestration

use crate::{errors::LocatorError, ports::ElementLookup, types::*};
use std::sync::Arc;
use stretch_core_types::ElementRef;
use tracing::{debug, warn};

/// Resolves slot ids to elements through the strategy fallback chain
#[derive(Clone)]
pub struct ElementLocator {
    lookup: Arc<dyn ElementLookup>,
    chain: Vec<LocatorStrategy>,
}

impl ElementLocator {
    /// Create a locator using the default fallback chain
    pub fn new(lookup: Arc<dyn ElementLookup>) -> Self {
        Self {
            lookup,
            chain: LocatorStrategy::fallback_chain(),
        }
    }

    /// Strategies in the order they are tried
    pub fn chain(&self) -> &[LocatorStrategy] {
        &self.chain
    }

    /// Locate the element for a slot, or `None` when every strategy misses
    pub fn locate(&self, slot_id: &str) -> Option<ElementRef> {
        match self.resolve(slot_id) {
            Ok(resolution) => Some(resolution.element),
            Err(err) => {
                debug!(slot = %slot_id, "{}", err);
                None
            }
        }
    }

    /// Resolve a slot and report which strategy matched
    pub fn resolve(&self, slot_id: &str) -> Result<Resolution, LocatorError> {
        if slot_id.trim().is_empty() {
            return Err(LocatorError::InvalidSlot("empty slot id".to_string()));
        }

        let hit = self.chain.iter().find_map(|strategy| {
            match strategy.run(self.lookup.as_ref(), slot_id) {
                Ok(Some(element)) => Some(Resolution {
                    element,
                    strategy: *strategy,
                }),
                Ok(None) => {
                    debug!(slot = %slot_id, strategy = strategy.name(), "no match");
                    None
                }
                Err(err) => {
                    debug!(slot = %slot_id, "{}", err);
                    None
                }
            }
        });

        match hit {
            Some(resolution) => {
                if !resolution.strategy.is_exact() {
                    warn!(
                        slot = %slot_id,
                        strategy = resolution.strategy.name(),
                        element = %resolution.element,
                        "Slot resolved through substring match"
                    );
                } else {
                    debug!(
                        slot = %slot_id,
                        strategy = resolution.strategy.name(),
                        element = %resolution.element,
                        "Slot resolved"
                    );
                }
                Ok(resolution)
            }
            None => Err(LocatorError::ElementNotFound(format!(
                "All strategies exhausted for slot: {}",
                slot_id
            ))),
        }
    }

    /// Try a single strategy without falling back
    pub fn try_strategy(
        &self,
        slot_id: &str,
        strategy: LocatorStrategy,
    ) -> Result<Option<ElementRef>, LocatorError> {
        strategy.run(self.lookup.as_ref(), slot_id)
    }
}
