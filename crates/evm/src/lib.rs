//! In-memory EVM execution, wrapping [`revm`].
//!
//! The EVM itself (opcode interpretation, gas metering, state journaling)
//! belongs to revm. This crate owns the pieces around it: an in-memory
//! account database, an environment template, deploy/call entry points, and
//! the conversion of raw execution results into decoded, user-facing ones.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod decode;
pub use decode::{decode_event_logs, decode_revert};

mod executor;
pub use executor::{
    CallResult, DeployResult, EvmError, ExecutionErr, Executor, RawCallResult,
};

mod opts;
pub use opts::EvmOpts;
