//! Float literal formatting for generated C++ source
//!
//! Values are written with the fewest digits that still parse back to the
//! same `f64`, so regenerated files only change when the numbers change.

use crate::{Result, TestgenError};

/// Smallest decimal exponent written in positional notation
const MIN_POSITIONAL_EXP: i32 = -4;
/// Decimal exponents at or above this are written in scientific notation
const MAX_POSITIONAL_EXP: i32 = 16;

/// Formats a finite `f64` as a C++ double literal
///
/// Exponents in `[-4, 16)` use positional notation (`2020.0`, `0.0001`),
/// others use scientific notation with a signed two-digit exponent
/// (`-1.5952813250071817e-05`, `1e+16`). Integral values keep a trailing
/// `.0` so the literal stays a double.
pub fn float_literal(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(TestgenError::NonFinite(value));
    }
    if value == 0.0 {
        return Ok(if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string());
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "-1.5952813250071817e-5"
    let sci = format!("{:e}", value);
    let (mantissa, exp) = sci
        .split_once('e')
        .and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e)))
        .ok_or_else(|| TestgenError::FloatFormat(sci.clone()))?;
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (MIN_POSITIONAL_EXP..MAX_POSITIONAL_EXP).contains(&exp) {
        positional(&digits, exp)
    } else {
        scientific(&digits, exp)
    };
    Ok(format!("{}{}", sign, body))
}

fn positional(digits: &str, exp: i32) -> String {
    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return format!("0.{}{}", zeros, digits);
    }

    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        let padding = "0".repeat(int_len - digits.len());
        format!("{}{}.0", digits, padding)
    } else {
        format!("{}.{}", &digits[..int_len], &digits[int_len..])
    }
}

fn scientific(digits: &str, exp: i32) -> String {
    let (lead, rest) = digits.split_at(1);
    let exp_sign = if exp < 0 { '-' } else { '+' };
    if rest.is_empty() {
        format!("{}e{}{:02}", lead, exp_sign, exp.abs())
    } else {
        format!("{}.{}e{}{:02}", lead, rest, exp_sign, exp.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2020.0, "2020.0")]
    #[case(2022.5, "2022.5")]
    #[case(0.1, "0.1")]
    #[case(0.0001, "0.0001")]
    #[case(1e-5, "1e-05")]
    #[case(100.0, "100.0")]
    #[case(1111164.8708100126, "1111164.8708100126")]
    #[case(-3189068.4999999986, "-3189068.4999999986")]
    #[case(-1.5952813250071817e-05, "-1.5952813250071817e-05")]
    #[case(-1.4630000000000003e-07, "-1.4630000000000003e-07")]
    #[case(3.76367e-05, "3.76367e-05")]
    #[case(1e16, "1e+16")]
    #[case(1234567890123456.0, "1234567890123456.0")]
    #[case(1.5e300, "1.5e+300")]
    #[case(0.0, "0.0")]
    #[case(-0.0, "-0.0")]
    fn test_float_literal(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(float_literal(value).unwrap(), expected);
    }

    #[test]
    fn test_literal_parses_back() {
        for value in [std::f64::consts::PI, -6.02214076e23, 9.109e-31, 6378137.0] {
            let literal = float_literal(value).unwrap();
            assert_eq!(literal.parse::<f64>().unwrap(), value, "{}", literal);
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            float_literal(f64::NAN),
            Err(TestgenError::NonFinite(_))
        ));
        assert!(matches!(
            float_literal(f64::INFINITY),
            Err(TestgenError::NonFinite(_))
        ));
    }
}
