//! revpeek-core — annotation-position resolution and peek-session lifecycle
//! for inline pull-request review, plus the capability-probing host bridge.
//!
//! The crate is deliberately headless: no terminal or rendering dependency,
//! only the seams the interactive layer needs. `model` and `buffer` hold the
//! data shapes, `review` the collaborator traits and the in-memory review
//! set, `resolve` the pointer-to-annotation path, `peek` the two-phase
//! session protocol, and `host` the service registry and callout bridge.

pub mod buffer;
pub mod host;
pub mod model;
pub mod peek;
pub mod resolve;
pub mod review;
