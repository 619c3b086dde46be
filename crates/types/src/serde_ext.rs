//! Serde adapters for the relay's bid JSON, which uses plain numbers and base64 where the
//! consensus APIs use quoted decimals and 0x-hex.

/// 256-bit integer as a bare JSON number. Only values that fit in 128 bits are representable.
pub mod u256_number {
    use alloy_primitives::U256;
    use serde::{de::Deserializer, ser::Error, Deserialize, Serializer};

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = u128::try_from(*value)
            .map_err(|_| S::Error::custom(format!("{value} does not fit a JSON number")))?;
        serializer.serialize_u128(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u128::deserialize(deserializer)?;
        Ok(U256::from(value))
    }
}

/// Byte string as standard padded base64. `null` reads as empty.
pub mod base64_bytes {
    use alloy_primitives::Bytes;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de::Deserializer, Deserialize, Serializer};

    pub fn serialize<S>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(Bytes::new());
        };
        STANDARD.decode(text).map(Bytes::from).map_err(serde::de::Error::custom)
    }
}
