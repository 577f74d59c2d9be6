//! Attribute-value encoding and the plain scalars it decodes into.
//!
//! A change-feed image wraps every attribute in a single-key object whose key
//! names the primitive type, e.g. `{"S": "text"}`, `{"N": "42"}` or
//! `{"BOOL": true}`. Only those three tags carry archivable scalars; every
//! other tag is kept as an explicit `Unsupported` arm and produces no output.

use crate::error::DecodeError;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{self, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;
use std::num::IntErrorKind;

/// One encoded attribute exactly as it arrives in an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `{"S": "..."}`
    S(String),
    /// `{"N": "..."}`, number carried as text
    N(String),
    /// `{"BOOL": true}`
    Bool(bool),
    /// Any other tag (`NULL`, `M`, `L`, `SS`, `NS`, `B`, `BS`, ...).
    /// Holds the first tag seen, empty if the object had no keys.
    Unsupported(String),
}

impl AttributeValue {
    /// The wire tag of this value.
    pub fn tag(&self) -> &str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Unsupported(tag) => tag,
        }
    }

    /// Decode into a plain scalar.
    ///
    /// Returns `Ok(None)` for unsupported tags. Numbers containing a `.` are
    /// decimals, everything else is an integer of whatever width it needs.
    pub fn decode(&self, attribute: &str) -> Result<Option<ScalarValue>, DecodeError> {
        match self {
            AttributeValue::S(s) => Ok(Some(ScalarValue::Str(s.clone()))),
            AttributeValue::N(n) => parse_number(attribute, n).map(Some),
            AttributeValue::Bool(b) => Ok(Some(ScalarValue::Bool(*b))),
            AttributeValue::Unsupported(_) => Ok(None),
        }
    }
}

fn parse_number(attribute: &str, raw: &str) -> Result<ScalarValue, DecodeError> {
    let text = raw.trim();
    if text.contains('.') {
        let value: f64 = text
            .parse()
            .map_err(|e: std::num::ParseFloatError| invalid_number(attribute, raw, e.to_string()))?;
        if !value.is_finite() {
            return Err(DecodeError::NonFiniteNumber {
                attribute: attribute.to_string(),
                value: raw.to_string(),
            });
        }
        Ok(ScalarValue::Decimal(value))
    } else {
        parse_integer(attribute, raw, text)
    }
}

/// `i64`, then `u64`, then the exact digits. Only non-integer text fails.
fn parse_integer(attribute: &str, raw: &str, text: &str) -> Result<ScalarValue, DecodeError> {
    let err = match text.parse::<i64>() {
        Ok(v) => return Ok(ScalarValue::Int(v)),
        Err(e) => e,
    };
    if !matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) {
        return Err(invalid_number(attribute, raw, err.to_string()));
    }
    if let Ok(v) = text.parse::<u64>() {
        return Ok(ScalarValue::UInt(v));
    }

    // Overflow means the text is an optional sign followed by digits only.
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    Ok(ScalarValue::BigInt(format!(
        "{sign}{}",
        digits.trim_start_matches('0')
    )))
}

fn invalid_number(attribute: &str, raw: &str, reason: String) -> DecodeError {
    DecodeError::InvalidNumber {
        attribute: attribute.to_string(),
        value: raw.to_string(),
        reason,
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeValueVisitor)
    }
}

struct AttributeValueVisitor;

impl<'de> Visitor<'de> for AttributeValueVisitor {
    type Value = AttributeValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an attribute value object such as {\"S\": \"text\"}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut s = None;
        let mut n = None;
        let mut b = None;
        let mut first_other: Option<String> = None;

        while let Some(tag) = map.next_key::<String>()? {
            match tag.as_str() {
                "S" => s = Some(map.next_value::<String>()?),
                "N" => n = Some(map.next_value::<String>()?),
                "BOOL" => b = Some(map.next_value::<bool>()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    if first_other.is_none() {
                        first_other = Some(tag.clone());
                    }
                }
            }
        }

        // S wins over N wins over BOOL when an object carries several tags.
        Ok(match (s, n, b) {
            (Some(s), _, _) => AttributeValue::S(s),
            (None, Some(n), _) => AttributeValue::N(n),
            (None, None, Some(b)) => AttributeValue::Bool(b),
            (None, None, None) => AttributeValue::Unsupported(first_other.unwrap_or_default()),
        })
    }
}

/// A decoded, plain scalar held per attribute in an archived item.
///
/// Serializes as the bare JSON scalar. Integers keep full precision on the
/// way out; reading an archive back, integers wider than 64 bits come back
/// as `Decimal` because `serde_json` parses them as `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Above `i64::MAX`, within `u64`
    UInt(u64),
    /// Integer wider than 64 bits, as normalized decimal digits
    BigInt(String),
    Decimal(f64),
}

impl ScalarValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ScalarValue::Int(v) => u64::try_from(*v).ok(),
            ScalarValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Decimal(v) => Some(*v),
            ScalarValue::Int(v) => Some(*v as f64),
            ScalarValue::UInt(v) => Some(*v as f64),
            ScalarValue::BigInt(digits) => digits.parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl Serialize for ScalarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScalarValue::Str(s) => serializer.serialize_str(s),
            ScalarValue::Bool(b) => serializer.serialize_bool(*b),
            ScalarValue::Int(v) => serializer.serialize_i64(*v),
            ScalarValue::UInt(v) => serializer.serialize_u64(*v),
            ScalarValue::BigInt(digits) => RawValue::from_string(digits.clone())
                .map_err(<S::Error as ser::Error>::custom)?
                .serialize(serializer),
            ScalarValue::Decimal(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarValueVisitor)
    }
}

struct ScalarValueVisitor;

impl<'de> Visitor<'de> for ScalarValueVisitor {
    type Value = ScalarValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ScalarValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ScalarValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map_or(ScalarValue::UInt(v), ScalarValue::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ScalarValue::Decimal(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ScalarValue::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ScalarValue::Str(v))
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Str(s) => write!(f, "{s}"),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Int(v) => write!(f, "{v}"),
            ScalarValue::UInt(v) => write!(f, "{v}"),
            ScalarValue::BigInt(digits) => f.write_str(digits),
            ScalarValue::Decimal(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(json: &str) -> AttributeValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn recognised_tags_deserialize() {
        assert_eq!(attr(r#"{"S":"a"}"#), AttributeValue::S("a".into()));
        assert_eq!(attr(r#"{"N":"3"}"#), AttributeValue::N("3".into()));
        assert_eq!(attr(r#"{"BOOL":false}"#), AttributeValue::Bool(false));
    }

    #[test]
    fn other_tags_are_unsupported() {
        assert_eq!(attr(r#"{"NULL":true}"#), AttributeValue::Unsupported("NULL".into()));
        assert_eq!(
            attr(r#"{"M":{"inner":{"S":"x"}}}"#),
            AttributeValue::Unsupported("M".into())
        );
        assert_eq!(attr(r#"{"SS":["a","b"]}"#).tag(), "SS");
        assert_eq!(attr("{}"), AttributeValue::Unsupported(String::new()));
    }

    #[test]
    fn string_tag_takes_precedence() {
        assert_eq!(attr(r#"{"BOOL":true,"N":"1","S":"x"}"#), AttributeValue::S("x".into()));
        assert_eq!(attr(r#"{"BOOL":true,"N":"1"}"#), AttributeValue::N("1".into()));
    }

    #[test]
    fn number_without_dot_is_integer() {
        let v = AttributeValue::N("42".into()).decode("count").unwrap();
        assert_eq!(v, Some(ScalarValue::Int(42)));
        let v = AttributeValue::N("-7".into()).decode("delta").unwrap();
        assert_eq!(v, Some(ScalarValue::Int(-7)));
    }

    #[test]
    fn number_with_dot_is_decimal() {
        let v = AttributeValue::N("21.5".into()).decode("temp").unwrap();
        assert_eq!(v, Some(ScalarValue::Decimal(21.5)));
        let v = AttributeValue::N("3.0".into()).decode("temp").unwrap();
        assert_eq!(v, Some(ScalarValue::Decimal(3.0)));
    }

    #[test]
    fn integer_just_above_i64_max_is_kept_exact() {
        let v = AttributeValue::N("9223372036854775808".into())
            .decode("id")
            .unwrap()
            .unwrap();
        assert_eq!(v, ScalarValue::UInt(9_223_372_036_854_775_808));
        assert_eq!(v.as_u64(), Some(9_223_372_036_854_775_808));
        assert_eq!(serde_json::to_string(&v).unwrap(), "9223372036854775808");

        let v = AttributeValue::N("12345678901234567890".into()).decode("id").unwrap();
        assert_eq!(v, Some(ScalarValue::UInt(12_345_678_901_234_567_890)));
    }

    #[test]
    fn integer_wider_than_64_bits_keeps_its_digits() {
        let digits = "12345678901234567890123456789012345678";
        let v = AttributeValue::N(digits.into()).decode("id").unwrap().unwrap();
        assert_eq!(v, ScalarValue::BigInt(digits.into()));
        assert_eq!(v.to_string(), digits);
        assert_eq!(
            serde_json::to_string(&[&v]).unwrap(),
            format!("[{digits}]")
        );

        let v = AttributeValue::N("-99999999999999999999".into()).decode("delta").unwrap();
        assert_eq!(v, Some(ScalarValue::BigInt("-99999999999999999999".into())));

        let v = AttributeValue::N("000123456789012345678901".into()).decode("id").unwrap();
        assert_eq!(v, Some(ScalarValue::BigInt("123456789012345678901".into())));
    }

    #[test]
    fn unparsable_number_is_an_error() {
        let err = AttributeValue::N("1e5".into()).decode("big").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { ref attribute, .. } if attribute == "big"));
        assert!(AttributeValue::N("abc.def".into()).decode("x").is_err());
        assert!(AttributeValue::N("12a".into()).decode("x").is_err());
        assert!(AttributeValue::N("".into()).decode("x").is_err());
    }

    #[test]
    fn unsupported_decodes_to_none() {
        let v = AttributeValue::Unsupported("L".into()).decode("list").unwrap();
        assert_eq!(v, None);
    }

    #[test]
    fn scalar_serializes_as_plain_json() {
        let values = vec![
            ScalarValue::Str("a".into()),
            ScalarValue::Int(3),
            ScalarValue::Decimal(1.5),
            ScalarValue::Bool(true),
        ];
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"["a",3,1.5,true]"#);
    }

    #[test]
    fn scalar_deserializes_by_json_type() {
        let back: Vec<ScalarValue> = serde_json::from_str(r#"["a",3,1.5,true]"#).unwrap();
        assert_eq!(back[0].as_str(), Some("a"));
        assert_eq!(back[1].as_i64(), Some(3));
        assert_eq!(back[2].as_f64(), Some(1.5));
        assert_eq!(back[3].as_bool(), Some(true));

        let wide: Vec<ScalarValue> = serde_json::from_str("[9223372036854775808]").unwrap();
        assert_eq!(wide, [ScalarValue::UInt(9_223_372_036_854_775_808)]);
    }
}
