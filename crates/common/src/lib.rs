//! Shared helpers for rendering decoded ABI values.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod fmt;
