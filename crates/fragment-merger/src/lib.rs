//! Fragment merger: writes stretch measurements into bid request fragments.
//!
//! Three scopes can receive data:
//! - global: `site.ext.data.responsiveStretch`
//! - per bidder: the same path inside each targeted bidder's fragment
//! - per impression: `ext.data.responsiveStretch` on the slot's impression
//!
//! Writes are deep merges, so re-applying an identical payload leaves the
//! tree unchanged. Nothing outside those paths is read or written.

pub mod errors;
pub mod merge;
pub mod merger;
pub mod tree;

pub use errors::{MergeError, Scope};
pub use merge::deep_merge;
pub use merger::{merge, merge_now, StretchPayload, RESPONSIVE_STRETCH_KEY};
pub use tree::AugmentationTree;
