//! End-to-end tests for the Quill interpreter
//!
//! These tests run script source through the parser and evaluator and
//! check the rendered result or the reported error.

mod harness;
mod arrows;
mod this_binding;
mod eval;
mod errors;
mod statements;

pub use harness::*;
