use serde::{Deserialize, Deserializer};

// Shopify and the bank both send ids and codes as either JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "opt_string_or_number")]
        code: Option<String>,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let p: Ids = serde_json::from_value(json!({"id": 1001, "code": "00"})).unwrap();
        assert_eq!(p.id, "1001");
        assert_eq!(p.code.as_deref(), Some("00"));

        let p: Ids = serde_json::from_value(json!({"id": "abc", "code": null})).unwrap();
        assert_eq!(p.id, "abc");
        assert_eq!(p.code, None);
    }

    #[test]
    fn rejects_other_json_types() {
        assert!(serde_json::from_value::<Ids>(json!({"id": true})).is_err());
        assert!(serde_json::from_value::<Ids>(json!({"id": "1", "code": [1]})).is_err());
    }
}
