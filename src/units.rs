// src/units.rs
//! Conversions between raw on-chain integers (smallest units, as digit strings)
//! and the decimal strings shown to humans or sent to the quote API.

/// Left-pad a digit string with zeros until it is at least `decimals` long.
///
/// The numeric value is unchanged; this is the amount format the quote API takes.
pub fn pad_to_width(balance: &str, decimals: usize) -> String {
    format!("{balance:0>decimals$}")
}

/// Render a raw balance as a decimal literal, e.g. `("1500000", 6)` -> `"1.500000"`.
///
/// With `decimals == 0` the integer is returned as is, without a trailing point.
pub fn format_units(balance: &str, decimals: usize) -> String {
    let padded = pad_to_width(balance, decimals);
    if decimals == 0 {
        return padded;
    }

    if padded.len() > decimals {
        let (whole, fraction) = padded.split_at(padded.len() - decimals);
        format!("{whole}.{fraction}")
    } else {
        format!("0.{padded}")
    }
}
