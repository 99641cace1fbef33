//! Value <-> payload conversion
//!
//! Payloads are JSON bytes. Decoding is typed, so a payload written for an
//! integer never comes back as a float and vice versa.

use crate::errors::CacheError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encode a value for storage
pub fn encode<T>(value: &T) -> Result<Vec<u8>, CacheError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(value).map_err(CacheError::SerializationError)
}

/// Decode a stored payload. `key` is only used for error reporting.
pub fn decode<T>(key: &str, payload: &[u8]) -> Result<T, CacheError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(payload).map_err(|source| CacheError::DeserializationError {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_float_round_trip() {
        let payload = encode(&12.5_f64).unwrap();
        let decoded: f64 = decode("k", &payload).unwrap();
        assert_eq!(decoded, 12.5);

        // Needs float_roundtrip to come back bit-exact
        let awkward = 7.123_456_789_012_345_f64;
        let decoded: f64 = decode("k", &encode(&awkward).unwrap()).unwrap();
        assert_eq!(decoded.to_bits(), awkward.to_bits());
    }

    #[test]
    fn test_integer_round_trip() {
        let payload = encode(&42_u64).unwrap();
        assert_eq!(payload, b"42");
        let decoded: u64 = decode("k", &payload).unwrap();
        assert_eq!(decoded, 42);
    }

    #[test]
    fn test_list_round_trip() {
        let payload = encode(&vec![6_i64, 7, 8]).unwrap();
        let decoded: Vec<i64> = decode("k", &payload).unwrap();
        assert_eq!(decoded, vec![6, 7, 8]);
    }

    #[test]
    fn test_float_never_decodes_as_integer() {
        let payload = encode(&12.5_f64).unwrap();
        let err = decode::<i64>("avg", &payload).unwrap_err();
        assert!(err.is_deserialization_error());
    }

    #[test]
    fn test_whole_float_stays_float() {
        let payload = encode(&7.0_f64).unwrap();
        assert_eq!(payload, b"7.0");
    }

    #[test]
    fn test_nested_record() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Summary {
            airline: String,
            delays: Vec<f64>,
            flights: u32,
        }

        let summary = Summary {
            airline: "VX".to_string(),
            delays: vec![1.5, 30.0],
            flights: 2,
        };
        let decoded: Summary = decode("k", &encode(&summary).unwrap()).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn test_corrupted_payload() {
        let err = decode::<f64>("broken", b"\x80\x04garbage").unwrap_err();
        match err {
            CacheError::DeserializationError { key, .. } => assert_eq!(key, "broken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
