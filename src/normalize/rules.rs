//! Composable value rules for common cleanups
//!
//! Each rule is a pure function over a single nullable scalar, usable
//! directly with [`Normalizer::with_rule`](super::Normalizer::with_rule).
//! Null input propagates as null unless noted otherwise.

use chrono::NaiveDate;

use crate::error::RuleError;
use crate::model::Value;

/// Date formats recognized by [`canonical_date`]
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%B %d, %Y",
];

/// Tokens treated as null by [`parse_numeric`]
const NULL_TOKENS: &[&str] = &["", "n/a", "na", "null", "none", "-"];

/// Uppercase string values; everything else passes through
pub fn upper_case(value: &Value) -> Result<Value, RuleError> {
    Ok(match value {
        Value::Str(s) => Value::Str(s.to_uppercase()),
        other => other.clone(),
    })
}

/// Lowercase string values; everything else passes through
pub fn lower_case(value: &Value) -> Result<Value, RuleError> {
    Ok(match value {
        Value::Str(s) => Value::Str(s.to_lowercase()),
        other => other.clone(),
    })
}

/// Collapse runs of whitespace to a single space and trim the ends
pub fn collapse_whitespace(value: &Value) -> Result<Value, RuleError> {
    Ok(match value {
        Value::Str(s) => Value::Str(s.split_whitespace().collect::<Vec<_>>().join(" ")),
        other => other.clone(),
    })
}

/// Canonicalize recognized date tokens to a date value (renders ISO-8601).
///
/// Dates and nulls pass through. An unrecognized token is a caller error:
/// the rule was pointed at a column that is not clean date data.
pub fn canonical_date(value: &Value) -> Result<Value, RuleError> {
    match value {
        Value::Str(s) => {
            let token = s.trim();
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(token, format) {
                    return Ok(Value::Date(date));
                }
            }
            Err(RuleError::UnrecognizedDate(s.clone()))
        }
        Value::Date(_) | Value::Null => Ok(value.clone()),
        other => Err(RuleError::UnrecognizedDate(other.to_string())),
    }
}

/// Parse messy numeric text to a float.
///
/// Currency symbols and thousands separators are stripped; placeholder
/// tokens ("N/A", "", "-", ...) and anything unparsable normalize to null
/// rather than erroring. Integers widen to float so a column ends up with
/// one numeric shape; floats and nulls pass through.
pub fn parse_numeric(value: &Value) -> Result<Value, RuleError> {
    Ok(match value {
        Value::Str(s) => {
            let token = s.trim();
            if NULL_TOKENS.contains(&token.to_lowercase().as_str()) {
                Value::Null
            } else {
                let cleaned: String = token
                    .chars()
                    .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
                    .collect();
                match cleaned.parse::<f64>() {
                    Ok(f) => Value::Float(f),
                    Err(_) => Value::Null,
                }
            }
        }
        Value::Int(i) => Value::Float(*i as f64),
        Value::Float(_) | Value::Null => value.clone(),
        _ => Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_string_case() {
        assert_eq!(upper_case(&Value::from("Alice")).unwrap(), Value::from("ALICE"));
        assert_eq!(lower_case(&Value::from("BOB")).unwrap(), Value::from("bob"));
        assert_eq!(upper_case(&Value::Int(3)).unwrap(), Value::Int(3));
        assert_eq!(upper_case(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace(&Value::from("  hello  world  ")).unwrap(),
            Value::from("hello world")
        );
        assert_eq!(
            collapse_whitespace(&Value::from("multiple    spaces")).unwrap(),
            Value::from("multiple spaces")
        );
    }

    #[test]
    fn test_canonical_date() {
        assert_eq!(canonical_date(&Value::from("2025-01-01")).unwrap(), date(2025, 1, 1));
        assert_eq!(canonical_date(&Value::from("01/02/2025")).unwrap(), date(2025, 1, 2));
        assert_eq!(canonical_date(&date(2025, 3, 4)).unwrap(), date(2025, 3, 4));
        assert_eq!(canonical_date(&Value::Null).unwrap(), Value::Null);
        assert!(matches!(
            canonical_date(&Value::from("not a date")),
            Err(RuleError::UnrecognizedDate(_))
        ));
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(&Value::from("1,234.56")).unwrap(), Value::Float(1234.56));
        assert_eq!(parse_numeric(&Value::from("$2,000")).unwrap(), Value::Float(2000.0));
        assert_eq!(parse_numeric(&Value::from("N/A")).unwrap(), Value::Null);
        assert_eq!(parse_numeric(&Value::from("")).unwrap(), Value::Null);
        assert_eq!(parse_numeric(&Value::from("garbage")).unwrap(), Value::Null);
        assert_eq!(parse_numeric(&Value::Int(7)).unwrap(), Value::Float(7.0));
        assert_eq!(parse_numeric(&Value::Float(1.5)).unwrap(), Value::Float(1.5));
        assert_eq!(parse_numeric(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_rules_are_idempotent() {
        for rule in [upper_case, collapse_whitespace, canonical_date, parse_numeric] {
            let inputs = [
                Value::from("X Y"),
                Value::Null,
                date(2025, 1, 1),
                Value::Float(2.5),
            ];
            for input in inputs {
                if let Ok(once) = rule(&input) {
                    assert_eq!(rule(&once).unwrap(), once);
                }
            }
        }
    }
}
