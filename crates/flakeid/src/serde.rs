//! Serde helpers for [`SnowflakeId`] fields.
//!
//! [`SnowflakeId`] serializes as its raw `u64` by default. Use these modules
//! with `#[serde(with = "...")]` to pick another representation.
//!
//! [`SnowflakeId`]: crate::SnowflakeId

/// Serializes a [`SnowflakeId`] as its decimal string.
///
/// Useful for consumers that parse numbers as IEEE doubles and would lose
/// precision above 2^53, such as JavaScript.
///
/// # Example
///
/// ```
/// use flakeid::SnowflakeId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(with = "flakeid::serde::as_string")]
///     id: SnowflakeId,
/// }
///
/// let event = Event { id: SnowflakeId::from_raw(135_168) };
/// let json = serde_json::to_string(&event).unwrap();
/// assert_eq!(json, r#"{"id":"135168"}"#);
///
/// let back: Event = serde_json::from_str(&json).unwrap();
/// assert_eq!(back.id, event.id);
/// ```
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_string {
    use ::serde::{Deserializer, Serializer, de};
    use core::fmt;

    use crate::SnowflakeId;

    /// Serialize a snowflake ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize a snowflake ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal `u64`
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_str(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl de::Visitor<'_> for DecimalVisitor {
        type Value = SnowflakeId;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal snowflake ID string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse().map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SnowflakeId;
    use ::serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Native {
        id: SnowflakeId,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct AsString {
        #[serde(with = "crate::serde::as_string")]
        id: SnowflakeId,
    }

    #[test]
    fn native_is_raw_integer() {
        let value = Native {
            id: SnowflakeId::from_components(0, 1, 1, 0),
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"id":135168}"#);
        assert_eq!(serde_json::from_str::<Native>(&json).unwrap(), value);
    }

    #[test]
    fn as_string_keeps_full_precision() {
        let value = AsString {
            id: SnowflakeId::from_raw(u64::MAX >> 1),
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"id":"9223372036854775807"}"#);
        assert_eq!(serde_json::from_str::<AsString>(&json).unwrap(), value);
    }

    #[test]
    fn as_string_rejects_garbage() {
        let err = serde_json::from_str::<AsString>(r#"{"id":"12a"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid snowflake ID"));
    }
}
