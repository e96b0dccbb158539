//! Release Reconciler - checks a canonical music catalog's artist and album
//! naming against commercial and encyclopedic providers.
//!
//! The engine lives in [`reconcile`]; [`cli`] wraps it in a small
//! command-line tool.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
#[cfg(test)]
pub mod test_utils;
