//! This crate provides fixtures shared by the tests of the other crates in this workspace.
//!
//! Everything here is seeded so that a failing test can be replayed exactly.

pub mod keys;
pub mod musig2;
pub mod prelude;
pub mod rng;
