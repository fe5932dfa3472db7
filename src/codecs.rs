//! Stock codecs for the usual custom scalars.
//!
//! Each submodule exports a free `encode`/`decode` pair ready to hand to
//! [`ScalarRegistry::register`](crate::registry::ScalarRegistry::register).
//! Mis-shaped input is rejected, never passed through.

pub mod datetime;
pub mod long;
