/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Serde helpers for fields the backend sends either as JSON strings or numbers
/// (`"spuCount": "3"` in one payload, `"spuCount": 3` in another).
pub mod lenient {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer, a numeric string or null")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 {
                Ok(Some(v as i64))
            } else {
                Err(E::custom(format!("expected an integer, got {v}")))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse::<i64>().map(Some).map_err(E::custom)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(I64Visitor)
        }
    }

    /// `"3"`, `3` → `3`; `null`, `""` → `0`
    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(d.deserialize_any(I64Visitor)?.unwrap_or_default())
    }

    /// `null` → empty list
    pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::Deserialize<'de>,
    {
        use serde::Deserialize;
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }

    /// `"3"`, `3` → `Some(3)`; `null`, `""` → `None`
    pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        d.deserialize_any(I64Visitor)
    }

    struct StringVisitor;

    impl<'de> Visitor<'de> for StringVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, a number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(StringVisitor)
        }
    }

    /// Numbers are rendered with `to_string`, `null` becomes `""`.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        d.deserialize_any(StringVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::lenient::i64", default)]
        count: i64,
        #[serde(deserialize_with = "super::lenient::opt_i64", default)]
        status: Option<i64>,
        #[serde(deserialize_with = "super::lenient::string", default)]
        id: String,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let a: Row = serde_json::from_str(r#"{"count":"3","status":10,"id":1568758870}"#).unwrap();
        assert_eq!(a.count, 3);
        assert_eq!(a.status, Some(10));
        assert_eq!(a.id, "1568758870");

        let b: Row = serde_json::from_str(r#"{"count":2,"status":"","id":"abc"}"#).unwrap();
        assert_eq!(b.count, 2);
        assert_eq!(b.status, None);
        assert_eq!(b.id, "abc");
    }

    #[test]
    fn missing_and_null_fall_back() {
        let p: Row = serde_json::from_str(r#"{"status":null,"id":null}"#).unwrap();
        assert_eq!(p.count, 0);
        assert_eq!(p.status, None);
        assert_eq!(p.id, "");
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Row>(r#"{"count":"x3"}"#).is_err());
    }
}
