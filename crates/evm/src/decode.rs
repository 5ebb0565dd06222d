//! Decoding of revert reasons and event logs.

use alloy_dyn_abi::{EventExt, JsonAbiExt};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Log};
use alloy_sol_types::{GenericContractError, SolInterface, SolValue};
use gavel_common::fmt::format_token;
use itertools::Itertools;
use revm::interpreter::{return_ok, InstructionResult};

/// The length of a solidity function selector, in bytes.
const SELECTOR_LEN: usize = 4;

/// Tries to decode an error message from the given revert bytes.
///
/// Note that this is just a best-effort guess, and should not be relied upon
/// for anything other than user output.
pub fn decode_revert(
    err: &[u8],
    maybe_abi: Option<&JsonAbi>,
    status: Option<InstructionResult>,
) -> String {
    if err.len() < SELECTOR_LEN {
        if let Some(status) = status {
            if !matches!(status, return_ok!()) {
                return format!("EvmError: {status:?}");
            }
        }
        return format!("custom error bytes {}", hex::encode_prefixed(err));
    }

    // Solidity's `Error(string)` or `Panic(uint256)`
    if let Ok(e) = GenericContractError::abi_decode(err, false) {
        return e.to_string();
    }

    let (selector, data) = err.split_at(SELECTOR_LEN);

    // Custom error from the given ABI
    if let Some(abi) = maybe_abi {
        if let Some(abi_error) = abi.errors().find(|e| e.selector().as_slice() == selector) {
            // if decoding fails, fall through and try to decode as a string
            if let Ok(decoded) = abi_error.abi_decode_input(data, false) {
                return format!(
                    "{}({})",
                    abi_error.name,
                    decoded.iter().map(format_token).format(", ")
                );
            }
        }
    }

    // ABI-encoded `string`
    if let Ok(s) = String::abi_decode(err, false) {
        return s;
    }

    // UTF-8-encoded string
    if let Ok(s) = std::str::from_utf8(err) {
        return s.to_string();
    }

    // Generic custom error
    format!(
        "custom error {}:{}",
        hex::encode(selector),
        std::str::from_utf8(data).map_or_else(|_| trimmed_hex(data), String::from)
    )
}

fn trimmed_hex(s: &[u8]) -> String {
    let s = hex::encode(s);
    let n = 32 * 2;
    if s.len() <= n {
        s
    } else {
        format!("{}...{} ({} bytes)", &s[..n / 2], &s[s.len() - n / 2..], s.len())
    }
}

/// Decodes the given logs against the events of `abi`.
///
/// Each matched log is rendered as `Name(param: value, ...)`; logs that match
/// no known event are rendered as raw hex.
pub fn decode_event_logs(abi: &JsonAbi, logs: &[Log]) -> Vec<String> {
    logs.iter().map(|log| decode_event_log(abi, log)).collect()
}

fn decode_event_log(abi: &JsonAbi, log: &Log) -> String {
    let Some(&selector) = log.data.topics().first() else {
        return format!("anonymous log: {}", hex::encode_prefixed(&log.data.data));
    };
    for event in abi.events() {
        if event.selector() != selector {
            continue;
        }
        let Ok(decoded) = event.decode_log(&log.data, false) else { continue };
        let mut indexed = decoded.indexed.iter();
        let mut body = decoded.body.iter();
        let params = event
            .inputs
            .iter()
            .filter_map(|input| {
                let value = if input.indexed { indexed.next() } else { body.next() }?;
                if input.name.is_empty() {
                    Some(format_token(value))
                } else {
                    Some(format!("{}: {}", input.name, format_token(value)))
                }
            })
            .join(", ");
        return format!("{}({params})", event.name);
    }
    format!(
        "unrecognized log {}: {}",
        hex::encode_prefixed(selector),
        hex::encode_prefixed(&log.data.data)
    )
}
