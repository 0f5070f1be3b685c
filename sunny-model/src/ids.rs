use std::fmt;

/// Identifier handed out by the content store.
///
/// The client never interprets it: it is echoed back in `data-*` attributes
/// and in request paths. The store emits either integers or strings, so both
/// are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OpaqueId {
    Int(i64),
    Text(String),
}

impl From<i64> for OpaqueId {
    fn from(value: i64) -> Self {
        OpaqueId::Int(value)
    }
}

impl From<&str> for OpaqueId {
    fn from(value: &str) -> Self {
        OpaqueId::Text(value.to_string())
    }
}

impl From<String> for OpaqueId {
    fn from(value: String) -> Self {
        OpaqueId::Text(value)
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueId::Int(id) => write!(f, "{id}"),
            OpaqueId::Text(id) => f.write_str(id),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_string_ids() {
        let ids: Vec<OpaqueId> = serde_json::from_str(r#"[7, "promo-3"]"#).unwrap();
        assert_eq!(ids, vec![OpaqueId::Int(7), OpaqueId::from("promo-3")]);
        assert_eq!(ids[0].to_string(), "7");
        assert_eq!(ids[1].to_string(), "promo-3");
    }
}
