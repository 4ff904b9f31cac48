use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The closed set of runtime types a document value can classify as.
///
/// Numeric sub-kinds are kept separate on purpose: the whole point of the
/// tool is surfacing fields that drift between e.g. int and string, or
/// int and double.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Null,
    Boolean,
    Int,
    Long,
    Double,
    String,
    Date,
    ObjectId,
    Binary,
    Undefined,
    Array,
    Object,
}

impl TypeTag {
    /// Classify a value. Total - every value maps to exactly one tag.
    ///
    /// Extended-JSON envelopes ({"$oid":..}, {"$date":..}, {"$binary":..},
    /// {"$undefined":true}) classify as their scalar kinds rather than
    /// plain objects.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i32::try_from(i).is_ok() {
                        TypeTag::Int
                    } else {
                        TypeTag::Long
                    }
                } else if n.is_u64() {
                    // Above i64::MAX, still an integer kind
                    TypeTag::Long
                } else {
                    TypeTag::Double
                }
            }
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(map) => {
                if map.contains_key("$oid") {
                    TypeTag::ObjectId
                } else if map.contains_key("$date") {
                    TypeTag::Date
                } else if map.contains_key("$binary") {
                    TypeTag::Binary
                } else if map.contains_key("$undefined") {
                    TypeTag::Undefined
                } else {
                    TypeTag::Object
                }
            }
        }
    }

    /// True for tags whose values the walker recurses into.
    pub fn is_container(self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::Object)
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Int => "int",
            TypeTag::Long => "long",
            TypeTag::Double => "double",
            TypeTag::String => "string",
            TypeTag::Date => "date",
            TypeTag::ObjectId => "objectid",
            TypeTag::Binary => "binary",
            TypeTag::Undefined => "undefined",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_classification() {
        assert_eq!(TypeTag::of(&json!(null)), TypeTag::Null);
        assert_eq!(TypeTag::of(&json!(true)), TypeTag::Boolean);
        assert_eq!(TypeTag::of(&json!("hello")), TypeTag::String);
        assert_eq!(TypeTag::of(&json!([1, 2])), TypeTag::Array);
        assert_eq!(TypeTag::of(&json!({"a": 1})), TypeTag::Object);
    }

    #[test]
    fn test_numeric_subkinds_stay_distinct() {
        assert_eq!(TypeTag::of(&json!(42)), TypeTag::Int);
        assert_eq!(TypeTag::of(&json!(-42)), TypeTag::Int);
        assert_eq!(TypeTag::of(&json!(i32::MAX)), TypeTag::Int);
        assert_eq!(TypeTag::of(&json!(i64::from(i32::MAX) + 1)), TypeTag::Long);
        assert_eq!(TypeTag::of(&json!(i64::MIN)), TypeTag::Long);
        assert_eq!(TypeTag::of(&json!(u64::MAX)), TypeTag::Long);
        assert_eq!(TypeTag::of(&json!(3.5)), TypeTag::Double);
    }

    #[test]
    fn test_extended_json_envelopes() {
        assert_eq!(
            TypeTag::of(&json!({"$oid": "507f1f77bcf86cd799439011"})),
            TypeTag::ObjectId
        );
        assert_eq!(
            TypeTag::of(&json!({"$date": "2024-01-01T00:00:00Z"})),
            TypeTag::Date
        );
        assert_eq!(
            TypeTag::of(&json!({"$binary": {"base64": "AAAA", "subType": "00"}})),
            TypeTag::Binary
        );
        assert_eq!(TypeTag::of(&json!({"$undefined": true})), TypeTag::Undefined);
        // A plain object with non-dollar keys stays an object
        assert_eq!(TypeTag::of(&json!({"oid": "x"})), TypeTag::Object);
    }

    #[test]
    fn test_container_tags() {
        assert!(TypeTag::Array.is_container());
        assert!(TypeTag::Object.is_container());
        assert!(!TypeTag::ObjectId.is_container());
        assert!(!TypeTag::Date.is_container());
        assert!(!TypeTag::String.is_container());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TypeTag::Int.to_string(), "int");
        assert_eq!(TypeTag::ObjectId.to_string(), "objectid");
        assert_eq!(TypeTag::Boolean.to_string(), "boolean");
    }
}
