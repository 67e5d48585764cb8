use stretch_core_types::ElementRef;

use crate::errors::LookupError;
use crate::types::ElementQuery;

/// Host capability for finding elements.
///
/// Implementations return the first match in their own element-tree order.
pub trait ElementLookup: Send + Sync {
    fn query(&self, query: &ElementQuery) -> Result<Option<ElementRef>, LookupError>;
}
