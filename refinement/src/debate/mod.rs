//! Refinement orchestration — session phases, the round loop, convergence.
//!
//! # Run Flow
//!
//! ```text
//! Init ──> Round(1) ──> Round(2) ──> … ──> Round(N) ──> Finalize ──> Done
//!   │         │                                            │
//!   │         │  per round, per track (STYLE then OBJECT): │
//!   │         │    primary → asking → commit + persist     │
//!   │         │                                            │
//!   │         └─ round 1: primaries get the topic focus    └─ one final
//!   │            instead of history                           invocation
//!   │                                                         per track
//!   └─ classifier entry: split the topic before Round(1);
//!      round 1 then has no asking turn
//! ```

pub mod controller;
pub mod convergence;
pub mod session;

pub use controller::{RoundController, RunError, RunOutcome};
pub use convergence::{converge_track, END_OF_PROMPT, OBJECT_TAG, STYLE_TAG};
pub use session::{RunPhase, RunSession, TransitionError};
