//! # Kind Coercion
//!
//! The one place where a value's runtime kind is compared against a
//! declared kind.
//!
//! Native documents compare kinds exactly: an `int8` is not an `int`.
//! Decoded documents (JSON and friends) collapse every number into one
//! `float64`, so within the numeric family a decoded value is accepted by
//! any numeric kind it converts into without loss. A decoded value with a
//! fractional part never converts into an integer kind.

use crate::kind::{Kind, Provenance};
use crate::value::{Number, Value};

/// Re-express `number` in `target`.
///
/// Returns `None` when the kinds differ and no lossless conversion is
/// allowed for this provenance.
pub fn coerce_number(number: &Number, target: Kind, provenance: Provenance) -> Option<Number> {
    if number.kind() == target {
        return Some(*number);
    }
    if provenance != Provenance::Decoded || !target.is_numeric() {
        return None;
    }

    if target.is_integer() {
        let exact = match number.as_i128() {
            Some(v) => v,
            None => {
                let v = number.as_f64();
                if !v.is_finite() || v.fract() != 0.0 {
                    return None;
                }
                if v < i128::MIN as f64 || v > i128::MAX as f64 {
                    return None;
                }
                v as i128
            }
        };
        return Number::from_integer(target, exact);
    }

    match target {
        Kind::Float32 => Some(Number::Float32(number.as_f64() as f32)),
        Kind::Float64 => Some(Number::Float64(number.as_f64())),
        _ => None,
    }
}

/// Check `value` against `expected`, returning the value expressed in the
/// expected kind on success.
pub fn coerce_value(value: &Value, expected: Kind, provenance: Provenance) -> Option<Value> {
    if expected == Kind::Any || value.kind() == expected {
        return Some(value.clone());
    }
    match value {
        Value::Number(n) => coerce_number(n, expected, provenance).map(Value::Number),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_kinds_compare_exactly() {
        let n = Number::Int8(5);
        assert_eq!(coerce_number(&n, Kind::Int8, Provenance::Native), Some(n));
        assert_eq!(coerce_number(&n, Kind::Int, Provenance::Native), None);
    }

    #[test]
    fn test_decoded_integral_float_becomes_integer() {
        let n = Number::Float64(80.0);
        assert_eq!(
            coerce_number(&n, Kind::Int, Provenance::Decoded),
            Some(Number::Int(80))
        );
        assert_eq!(
            coerce_number(&n, Kind::Uint16, Provenance::Decoded),
            Some(Number::Uint16(80))
        );
    }

    #[test]
    fn test_decoded_fraction_never_becomes_integer() {
        let n = Number::Float64(80.5);
        assert_eq!(coerce_number(&n, Kind::Int, Provenance::Decoded), None);
        assert_eq!(
            coerce_number(&n, Kind::Float32, Provenance::Decoded),
            Some(Number::Float32(80.5))
        );
    }

    #[test]
    fn test_decoded_out_of_range_is_rejected() {
        let n = Number::Float64(300.0);
        assert_eq!(coerce_number(&n, Kind::Int8, Provenance::Decoded), None);
        let n = Number::Float64(-1.0);
        assert_eq!(coerce_number(&n, Kind::Uint, Provenance::Decoded), None);
    }

    #[test]
    fn test_form_values_compare_exactly() {
        let n = Number::Int(3);
        assert_eq!(coerce_number(&n, Kind::Int64, Provenance::Form), None);
    }

    #[test]
    fn test_coerce_value_non_numeric() {
        let v = Value::from("x");
        assert_eq!(coerce_value(&v, Kind::String, Provenance::Decoded), Some(v.clone()));
        assert_eq!(coerce_value(&v, Kind::Int, Provenance::Decoded), None);
        assert_eq!(coerce_value(&v, Kind::Any, Provenance::Native), Some(v));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decoded_integers_round_trip_through_int(v in -1_000_000_000i64..1_000_000_000) {
            let decoded = Number::Float64(v as f64);
            prop_assert_eq!(
                coerce_number(&decoded, Kind::Int, Provenance::Decoded),
                Some(Number::Int(v))
            );
        }

        #[test]
        fn decoded_fractions_never_coerce_to_integers(
            v in -1_000_000i64..1_000_000,
            frac in 0.01f64..0.99,
        ) {
            let decoded = Number::Float64(v as f64 + frac);
            prop_assert_eq!(coerce_number(&decoded, Kind::Int64, Provenance::Decoded), None);
        }
    }
}
