//! Slot locator - ordered multi-strategy element resolution
//!
//! Resolves an ad slot identifier to a rendered element by trying, in a
//! fixed order, exact id, id attribute, two data attribute spellings,
//! id substring and class substring matches. The first hit wins; a miss on
//! every strategy is a normal outcome, not an error.

pub mod errors;
pub mod ports;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use ports::ElementLookup;
pub use resolver::ElementLocator;
pub use types::*;
