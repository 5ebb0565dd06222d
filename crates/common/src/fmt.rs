//! Formatting helpers for decoded ABI values.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, Sign, I256, U256};
use std::fmt;

/// [`DynSolValue`] formatter.
struct DynValueFormatter {
    raw: bool,
}

impl DynValueFormatter {
    /// Recursively formats a [`DynSolValue`].
    fn value(&self, value: &DynSolValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match value {
            DynSolValue::Address(inner) => write!(f, "{inner}"),
            DynSolValue::Function(inner) => write!(f, "{inner}"),
            DynSolValue::Bytes(inner) => f.write_str(&hex::encode_prefixed(inner)),
            DynSolValue::FixedBytes(word, size) => {
                f.write_str(&hex::encode_prefixed(&word[..*size]))
            }
            DynSolValue::Uint(inner, _) => {
                if self.raw {
                    write!(f, "{inner}")
                } else {
                    f.write_str(&format_uint_exp(*inner))
                }
            }
            DynSolValue::Int(inner, _) => {
                if self.raw {
                    write!(f, "{inner}")
                } else {
                    f.write_str(&format_int_exp(*inner))
                }
            }
            DynSolValue::Array(values) | DynSolValue::FixedArray(values) => {
                f.write_str("[")?;
                self.list(values, f)?;
                f.write_str("]")
            }
            DynSolValue::Tuple(values) => self.tuple(values, f),
            DynSolValue::String(inner) => write!(f, "{inner:?}"), // escape strings
            DynSolValue::Bool(inner) => write!(f, "{inner}"),
            DynSolValue::CustomStruct { name, prop_names, tuple } => {
                if self.raw {
                    return self.tuple(tuple, f);
                }

                f.write_str(name)?;

                if prop_names.len() == tuple.len() {
                    f.write_str("({ ")?;

                    for (i, (prop_name, value)) in std::iter::zip(prop_names, tuple).enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        f.write_str(prop_name)?;
                        f.write_str(": ")?;
                        self.value(value, f)?;
                    }

                    f.write_str(" })")
                } else {
                    self.tuple(tuple, f)
                }
            }
        }
    }

    /// Recursively formats a comma-separated list of [`DynSolValue`]s.
    fn list(&self, values: &[DynSolValue], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.value(value, f)?;
        }
        Ok(())
    }

    /// Formats the given values as a tuple.
    fn tuple(&self, values: &[DynSolValue], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        self.list(values, f)?;
        f.write_str(")")
    }
}

/// Wrapper that implements [`Display`](fmt::Display) for a [`DynSolValue`].
struct DynValueDisplay<'a> {
    value: &'a DynSolValue,
    formatter: DynValueFormatter,
}

impl<'a> DynValueDisplay<'a> {
    #[inline]
    fn new(value: &'a DynSolValue, raw: bool) -> Self {
        Self { value, formatter: DynValueFormatter { raw } }
    }
}

impl fmt::Display for DynValueDisplay<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.formatter.value(self.value, f)
    }
}

/// Pretty-prints the given value into a string.
pub fn format_token(value: &DynSolValue) -> String {
    DynValueDisplay::new(value, false).to_string()
}

/// Prints the given value into a string, without adding exponential notation
/// hints or struct names.
pub fn format_token_raw(value: &DynSolValue) -> String {
    DynValueDisplay::new(value, true).to_string()
}

/// Pretty-prints a slice of values using [`format_token`].
pub fn format_tokens(tokens: &[DynSolValue]) -> impl Iterator<Item = String> + '_ {
    tokens.iter().map(format_token)
}

/// Formats a U256 number to string, adding an exponential notation hint for
/// large values.
///
/// Examples: `1234` -> `1234`, `1234567890` -> `1234567890 [1.234e9]`.
pub fn format_uint_exp(num: U256) -> String {
    if num < U256::from(10_000) {
        return num.to_string();
    }

    let exp = to_exp_notation(num, 4, true, Sign::Positive);
    format!("{num} [{exp}]")
}

/// Formats an I256 number to string, adding an exponential notation hint for
/// large values.
pub fn format_int_exp(num: I256) -> String {
    let (sign, abs) = num.into_sign_and_abs();
    if abs < U256::from(10_000) {
        return format!("{sign}{abs}");
    }

    let exp = to_exp_notation(abs, 4, true, sign);
    format!("{sign}{abs} [{exp}]")
}

/// Returns the number expressed as a string in exponential notation with the
/// given precision (number of significant figures), optionally removing
/// trailing zeros from the mantissa.
pub fn to_exp_notation(value: U256, precision: usize, trim_end_zeros: bool, sign: Sign) -> String {
    let stringified = value.to_string();
    let exponent = stringified.len() - 1;
    let mut mantissa = stringified.chars().take(precision).collect::<String>();

    if trim_end_zeros {
        mantissa = mantissa.trim_end_matches('0').to_string();
    }

    // Place a decimal point only if needed, e.g. 1234 -> 1.234e3, 5 -> 5.
    if mantissa.len() > 1 {
        mantissa.insert(1, '.');
    }

    format!("{sign}{mantissa}e{exponent}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, B256};

    #[test]
    fn format_addresses_and_strings() {
        let addr = address!("0000000000000000000000000000000000000201");
        assert_eq!(
            format_token(&DynSolValue::Address(addr)),
            "0x0000000000000000000000000000000000000201"
        );
        assert_eq!(format_token(&DynSolValue::String("ipfs://Qm".into())), "\"ipfs://Qm\"");
        assert_eq!(format_token(&DynSolValue::Bool(true)), "true");
    }

    #[test]
    fn format_uints_with_exp_hint() {
        assert_eq!(format_token(&DynSolValue::Uint(U256::from(1), 256)), "1");
        assert_eq!(
            format_token(&DynSolValue::Uint(U256::from(1234567890u64), 256)),
            "1234567890 [1.234e9]"
        );
        assert_eq!(format_token_raw(&DynSolValue::Uint(U256::from(1234567890u64), 256)), "1234567890");
    }

    #[test]
    fn format_tuples_and_arrays() {
        let value = DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(7), 256),
            DynSolValue::Array(vec![DynSolValue::Bool(false), DynSolValue::Bool(true)]),
        ]);
        assert_eq!(format_token(&value), "(7, [false, true])");

        let word = DynSolValue::FixedBytes(B256::repeat_byte(0x11), 4);
        assert_eq!(format_token(&word), "0x11111111");
    }

    #[test]
    fn exp_notation() {
        assert_eq!(to_exp_notation(U256::from(1234124124u64), 4, false, Sign::Positive), "1.234e9");
        assert_eq!(to_exp_notation(U256::from(10000000u64), 3, true, Sign::Positive), "1e7");
    }
}
