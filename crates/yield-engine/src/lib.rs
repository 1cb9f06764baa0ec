//! # Bond Yield Engine
//!
//! This crate contains the realized-yield calculation that the rest of the
//! system exists to feed and publish. It decides, per bond, whether the
//! source data is trustworthy enough to rank, and if so derives the cost of
//! buying the bond today and holding it to redemption.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems and performs no I/O. It depends only on `core-types`
//!   and the screening parameters from `configuration`.
//! - **Tagged outcomes:** a bond that cannot be ranked is not an error and
//!   not a silent `None`. It is `ScreeningOutcome::Rejected` with a reason,
//!   so callers and tests can tell "no yield" apart from a calculator bug.
//! - **Deterministic:** "now" is an explicit argument. Identical inputs and
//!   a fixed now produce identical reports.
//!
//! ## Public API
//!
//! - `YieldEngine`: the stateless calculator.
//! - `ScreeningOutcome` / `RejectReason`: the tagged result of screening one bond.
//! - `YieldReport`: the derived record consumed by the report sink.
//! - `EngineError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{RejectReason, ScreeningOutcome, YieldEngine};
pub use error::EngineError;
pub use report::YieldReport;
