//! Byte fields on the wire.
//!
//! The engine writes payloads and results as raw bytes inside JSON documents,
//! which means standard base64 strings. These helpers plug into
//! `#[serde(with = ...)]`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serializer};

pub mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD.decode(raw).map_err(serde::de::Error::custom)
    }
}

pub mod base64_opt_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.is_empty() => STANDARD
                .decode(raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super::base64_bytes", default)]
        payload: Vec<u8>,
        #[serde(
            with = "super::base64_opt_bytes",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        result: Option<Vec<u8>>,
    }

    #[test]
    fn payload_is_base64_on_the_wire() {
        let holder = Holder {
            payload: br#"{"arg1":1}"#.to_vec(),
            result: None,
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"payload":"eyJhcmcxIjoxfQ=="}"#);
    }

    #[test]
    fn null_and_missing_fields_decode_to_empty() {
        let holder: Holder = serde_json::from_str(r#"{"payload":null,"result":""}"#).unwrap();
        assert!(holder.payload.is_empty());
        assert_eq!(holder.result, None);

        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.payload.is_empty());
    }
}
