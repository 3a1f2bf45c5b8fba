//! Role-partitioned, append-only refinement history.
//!
//! Three views over one commit sequence: the unified log (both tracks,
//! commit order) and a projection per track. Records are appended by the
//! round controller only, persisted after every append, and rendered
//! deterministically when composed into agent context.

pub mod record;
pub mod render;
pub mod store;

pub use record::{output_is_structured, RoundRecord, Track};
pub use render::render_history;
pub use store::{HistoryError, HistoryStore};
