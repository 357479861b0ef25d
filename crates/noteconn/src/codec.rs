use crate::value::Attrs;

/// Encode an attribute mapping as the textual metadata record.
///
/// The record is a single JSON object. Scalar kinds survive exactly:
/// integers stay integers, floats stay floats, booleans and null stay
/// themselves, and nesting is preserved to arbitrary depth.
pub fn encode(attrs: &Attrs) -> serde_json::Result<String> {
    serde_json::to_string_pretty(attrs)
}

/// Decode a metadata record back into an attribute mapping.
///
/// Callers own the policy for parse failures; the filesystem backend
/// maps them to the corrupt-node error class.
pub fn decode(text: &str) -> serde_json::Result<Attrs> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::collections::BTreeMap;

    fn roundtrip(attrs: &Attrs) -> Attrs {
        decode(&encode(attrs).unwrap()).unwrap()
    }

    #[test]
    fn test_scalar_kinds_survive() {
        let mut attrs = Attrs::new();
        attrs.insert("key1".into(), Value::Int(1));
        attrs.insert("key2".into(), Value::Float(2.0));
        attrs.insert("key3".into(), Value::Text("3".into()));
        attrs.insert("key4".into(), Value::Bool(true));
        attrs.insert("key5".into(), Value::Null);

        let back = roundtrip(&attrs);
        assert_eq!(back, attrs);
        // The float/int distinction must hold even where the numeric
        // values are equal.
        assert_eq!(back["key1"], Value::Int(1));
        assert_eq!(back["key2"], Value::Float(2.0));
        assert_eq!(back["key4"], Value::Bool(true));
    }

    #[test]
    fn test_empty_mapping() {
        let attrs = Attrs::new();
        assert_eq!(roundtrip(&attrs), attrs);
    }

    #[test]
    fn test_nested_structure() {
        let mut inner = BTreeMap::new();
        inner.insert("a".to_string(), Value::Int(1));
        inner.insert("bb".to_string(), Value::Int(2));
        inner.insert("cc".to_string(), Value::Float(4.0));

        let mut attrs = Attrs::new();
        attrs.insert(
            "a list".into(),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Text("x".into())]),
        );
        attrs.insert("a dict".into(), Value::Map(inner));

        assert_eq!(roundtrip(&attrs), attrs);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        assert!(decode("not a record").is_err());
        // A record must be a mapping at the top level.
        assert!(decode("[1, 2]").is_err());
    }
}
