//! Core expression-tree IR: node model, visitors, compiler, reifier.
//!
//! Computations are modeled as immutable, arena-allocated trees that can
//! be traversed, rewritten with structural sharing, lowered to a callable
//! or to script text, and reified back into source that reconstructs an
//! equivalent tree.
//!
//! This crate is the implementation; the `ramus` facade crate re-exports
//! the public API with a guided overview.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod compile;
pub mod errors;
pub mod reify;
pub mod scopes;
pub mod tree;
pub mod visit;

pub use errors::Error;
