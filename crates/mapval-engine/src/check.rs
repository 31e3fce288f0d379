//! # Field Checks
//!
//! Resolves one field against its rule: null handling, then shape dispatch,
//! then bounds. Returns the coerced value or the first violation. Recursion
//! into nested rule sets happens in [`crate::engine`], including for list
//! elements whose rule is a container; this module only checks that a
//! nested value has the right container shape.

use std::net::Ipv4Addr;

use mapval_core::coerce::coerce_value;
use mapval_core::sniff::{check_file, is_suspicious_markup};
use mapval_core::{FileConstraints, Kind, Number, Provenance, Value};
use mapval_rules::messages::{
    render_or, Placeholders, ACTUAL_LENGTH, ACTUAL_TYPE, EXPECTED_LENGTH, EXPECTED_TYPE,
};
use mapval_rules::{EnumSet, Ipv4Form, Rule, Shape};
use regex::Regex;
use uuid::Uuid;

use crate::error::{Violation, ViolationKind};

/// Check `raw` (the document's value for `field`, if any) against `rule`.
pub(crate) fn check_field(
    field: &str,
    raw: Option<&Value>,
    rule: &Rule,
    provenance: Provenance,
) -> Result<Value, Violation> {
    let value = match raw {
        None | Some(Value::Null) => return null_value(field, rule),
        Some(value) => value,
    };

    let checked = match rule.shape() {
        Shape::File(constraints) => check_upload(field, value, constraints, rule),
        Shape::Regex(re) => check_regex(field, value, re, rule),
        Shape::Enum(set) => check_enum(field, value, set, rule, provenance),
        Shape::Uuid { keep_string } => check_uuid(field, value, *keep_string),
        Shape::Email => check_email(field, value).and_then(|v| check_bounds(field, v, rule)),
        Shape::Ipv4(form) => check_ipv4(field, value, *form),
        Shape::PrimitiveList(element) => {
            check_primitive_list(field, value, element, rule, provenance)
        }
        Shape::ListOfObject(_) => check_object_list(field, value, rule),
        Shape::Object(_) => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => Err(Violation::new(
                ViolationKind::Format,
                field,
                format!("field '{field}' is not valid object"),
            )),
        },
        Shape::AnyObject => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => Err(Violation::new(
                ViolationKind::Format,
                field,
                format!("data in '{field}' field is not valid object"),
            )),
        },
        Shape::Kind(kind) => check_kind(field, value, *kind, rule, provenance),
    }?;

    if rule.rejects_markup() {
        if let Value::String(text) = &checked {
            if is_suspicious_markup(text) {
                return Err(Violation::new(
                    ViolationKind::Markup,
                    field,
                    format!("the field '{field}' contains suspicious markup"),
                ));
            }
        }
    }
    Ok(checked)
}

fn null_value(field: &str, rule: &Rule) -> Result<Value, Violation> {
    if !rule.is_nullable() && !rule.has_presence_dependency() {
        let message = render_or(
            rule.custom_messages().on_null.as_deref(),
            &Placeholders::field(field),
            || format!("we need '{field}' field"),
        );
        return Err(Violation::new(ViolationKind::Missing, field, message));
    }
    // An absent field with a presence dependency stays null so the group
    // check sees it as absent.
    if rule.has_presence_dependency() {
        return Ok(Value::Null);
    }
    if let Some(default) = rule.default_value() {
        return Ok(default.clone());
    }
    if matches!(rule.shape(), Shape::Kind(Kind::Bool)) {
        return Ok(Value::Bool(false));
    }
    Ok(Value::Null)
}

fn type_mismatch(field: &str, expected: Kind, actual: &Value, rule: &Rule) -> Violation {
    let placeholders = Placeholders::field(field)
        .with(EXPECTED_TYPE, expected)
        .with(ACTUAL_TYPE, actual.kind());
    let message = render_or(
        rule.custom_messages().on_type_mismatch.as_deref(),
        &placeholders,
        || format!("the field '{field}' should be '{expected}'"),
    );
    Violation::new(ViolationKind::TypeMismatch, field, message)
}

// ─── Shapes ──────────────────────────────────────────────────────────

fn check_kind(
    field: &str,
    value: &Value,
    kind: Kind,
    rule: &Rule,
    provenance: Provenance,
) -> Result<Value, Violation> {
    let coerced = coerce_value(value, kind, provenance)
        .ok_or_else(|| type_mismatch(field, kind, value, rule))?;

    if kind == Kind::List && !rule.is_nullable() {
        if let Value::List(items) = &coerced {
            if items.is_empty() {
                return Err(Violation::new(
                    ViolationKind::Missing,
                    field,
                    format!("you need to input data in '{field}' field"),
                ));
            }
        }
    }
    check_bounds(field, coerced, rule)
}

fn check_upload(
    field: &str,
    value: &Value,
    constraints: &FileConstraints,
    rule: &Rule,
) -> Result<Value, Violation> {
    let Value::File(upload) = value else {
        return Err(type_mismatch(field, Kind::File, value, rule));
    };
    check_file(upload, constraints)
        .map_err(|rejection| Violation::new(ViolationKind::File, field, rejection.to_string()))?;
    Ok(value.clone())
}

fn check_regex(field: &str, value: &Value, re: &Regex, rule: &Rule) -> Result<Value, Violation> {
    let custom = rule.custom_messages().on_regex.as_deref();
    let placeholders = Placeholders::field(field);
    let Value::String(text) = value else {
        let message = render_or(custom, &placeholders, || {
            format!("the field '{field}' should be string")
        });
        return Err(Violation::new(ViolationKind::TypeMismatch, field, message));
    };
    if !re.is_match(text) {
        let message = render_or(custom, &placeholders, || {
            format!("the field '{field}' is not valid regex")
        });
        return Err(Violation::new(ViolationKind::Format, field, message));
    }
    Ok(value.clone())
}

fn check_enum(
    field: &str,
    value: &Value,
    set: &EnumSet,
    rule: &Rule,
    provenance: Provenance,
) -> Result<Value, Violation> {
    let coerced = coerce_value(value, set.kind(), provenance)
        .ok_or_else(|| type_mismatch(field, set.kind(), value, rule))?;
    if !set.contains(&coerced) {
        let message = render_or(
            rule.custom_messages().on_enum_mismatch.as_deref(),
            &Placeholders::field(field),
            || format!("the field '{field}' value is not in enum list{set}"),
        );
        return Err(Violation::new(ViolationKind::Enum, field, message));
    }
    Ok(coerced)
}

fn check_uuid(field: &str, value: &Value, keep_string: bool) -> Result<Value, Violation> {
    let invalid = || {
        Violation::new(
            ViolationKind::Format,
            field,
            format!("the field '{field}' it's not valid uuid"),
        )
    };
    match value {
        Value::Uuid(id) if keep_string => Ok(Value::String(id.hyphenated().to_string())),
        Value::Uuid(_) => Ok(value.clone()),
        Value::String(text) => {
            let id = Uuid::parse_str(text).map_err(|_| invalid())?;
            if keep_string {
                Ok(value.clone())
            } else {
                Ok(Value::Uuid(id))
            }
        }
        _ => Err(invalid()),
    }
}

fn check_email(field: &str, value: &Value) -> Result<Value, Violation> {
    let valid = value.as_str().is_some_and(|text| {
        text.split('@')
            .nth(1)
            .is_some_and(|domain| domain.contains('.'))
    });
    if !valid {
        return Err(Violation::new(
            ViolationKind::Format,
            field,
            format!("field {field} is not valid email"),
        ));
    }
    Ok(value.clone())
}

fn check_ipv4(field: &str, value: &Value, form: Ipv4Form) -> Result<Value, Violation> {
    let suffix = if form == Ipv4Form::Network { " Network" } else { "" };
    let invalid = || {
        Violation::new(
            ViolationKind::Format,
            field,
            format!("the field '{field}' it's not valid IP{suffix}"),
        )
    };
    let text = value.as_str().ok_or_else(invalid)?;
    let valid = match form {
        Ipv4Form::Plain => text.parse::<Ipv4Addr>().is_ok(),
        Ipv4Form::Network => text
            .parse::<Ipv4Addr>()
            .is_ok_and(|addr| addr.octets()[3] == 0),
        Ipv4Form::OptionalPrefix => {
            let mut parts = text.split('/');
            let addr_ok = parts.next().is_some_and(|a| a.parse::<Ipv4Addr>().is_ok());
            let prefix_ok = match parts.next() {
                None => true,
                Some(p) => p.parse::<u8>().is_ok_and(|p| p <= 32),
            };
            addr_ok && prefix_ok && parts.next().is_none()
        }
    };
    if !valid {
        return Err(invalid());
    }
    Ok(value.clone())
}

fn check_primitive_list(
    field: &str,
    value: &Value,
    element: &Rule,
    rule: &Rule,
    provenance: Provenance,
) -> Result<Value, Violation> {
    let Value::List(items) = value else {
        return Err(type_mismatch(field, Kind::List, value, rule));
    };
    check_length(field, items.len(), rule)?;

    let coerced = items
        .iter()
        .enumerate()
        .map(|(i, item)| check_field(&format!("{field}[{i}]"), Some(item), element, provenance))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::List(coerced))
}

fn check_object_list(field: &str, value: &Value, rule: &Rule) -> Result<Value, Violation> {
    let is_object_list = value
        .as_list()
        .is_some_and(|items| items.iter().all(|item| matches!(item, Value::Object(_))));
    if !is_object_list {
        return Err(Violation::new(
            ViolationKind::Format,
            field,
            format!("field '{field}' is not valid list object"),
        ));
    }
    if let Value::List(items) = value {
        check_length(field, items.len(), rule)?;
    }
    Ok(value.clone())
}

// ─── Bounds ──────────────────────────────────────────────────────────

/// Apply Min/Max: code points for text, value for numbers, length for lists.
fn check_bounds(field: &str, value: Value, rule: &Rule) -> Result<Value, Violation> {
    match &value {
        Value::String(text) => {
            let count = text.chars().count();
            check_measure(field, rule, " character", count.to_string(), |bound| {
                compare_count(count, bound)
            })?;
        }
        Value::Number(number) => {
            check_measure(field, rule, "", number.to_string(), |bound| {
                compare_number(number, bound)
            })?;
        }
        Value::List(items) => check_length(field, items.len(), rule)?,
        _ => {}
    }
    Ok(value)
}

fn check_length(field: &str, len: usize, rule: &Rule) -> Result<(), Violation> {
    check_measure(field, rule, " item", len.to_string(), |bound| compare_count(len, bound))
}

/// `compare(bound)` orders the measured quantity relative to `bound`.
fn check_measure(
    field: &str,
    rule: &Rule,
    unit: &str,
    actual: String,
    compare: impl Fn(i64) -> std::cmp::Ordering,
) -> Result<(), Violation> {
    let messages = rule.custom_messages();
    if let Some(min) = rule.min_bound() {
        if compare(min).is_lt() {
            let placeholders = Placeholders::field(field)
                .with(ACTUAL_LENGTH, &actual)
                .with(EXPECTED_LENGTH, min);
            let message = render_or(messages.on_min.as_deref(), &placeholders, || {
                format!("the field '{field}' should be or greater than {min}{unit}")
            });
            return Err(Violation::new(ViolationKind::Bound, field, message));
        }
    }
    if let Some(max) = rule.max_bound() {
        if compare(max).is_gt() {
            let placeholders = Placeholders::field(field)
                .with(ACTUAL_LENGTH, &actual)
                .with(EXPECTED_LENGTH, max);
            let message = render_or(messages.on_max.as_deref(), &placeholders, || {
                format!("the field '{field}' should be or lower than {max}{unit}")
            });
            return Err(Violation::new(ViolationKind::Bound, field, message));
        }
    }
    Ok(())
}

fn compare_count(count: usize, bound: i64) -> std::cmp::Ordering {
    i128::try_from(count)
        .unwrap_or(i128::MAX)
        .cmp(&i128::from(bound))
}

fn compare_number(number: &Number, bound: i64) -> std::cmp::Ordering {
    match number.as_i128() {
        Some(exact) => exact.cmp(&i128::from(bound)),
        None => number
            .as_f64()
            .partial_cmp(&(bound as f64))
            .unwrap_or(std::cmp::Ordering::Equal),
    }
}
