use crate::prelude::*;

/// Helper trait to serialize objects that have a canonical byte representation.
pub trait CanonicalBytes: Sized {
    /// Convert into the canonical bytes.
    fn canonical_bytes(&self) -> Vec<u8>;
    /// Reconstruct from the canonical bytes.
    fn from_canonical_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Serde helpers for `CanonicalBytes` objects.
pub mod obj_serde {
    use crate::prelude::*;
    use serde::de::{SeqAccess, Visitor};

    /// Collects the raw bytes of an object, base64-decoding human-readable input.
    pub struct BytesVisitor;

    impl<'de> Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
            formatter.write_str("a valid canonical byte string")
        }

        fn visit_seq<V>(self, mut seq: V) -> core::result::Result<Vec<u8>, V::Error>
        where
            V: SeqAccess<'de>,
        {
            let mut vec: Vec<u8> = vec![];
            while let Some(x) = seq.next_element()? {
                vec.push(x);
            }
            Ok(vec)
        }

        fn visit_bytes<E>(self, v: &[u8]) -> core::result::Result<Vec<u8>, E> {
            Ok(v.to_vec())
        }

        fn visit_str<E>(self, v: &str) -> core::result::Result<Vec<u8>, E>
        where
            E: serde::de::Error,
        {
            b64dec(v).map_err(serde::de::Error::custom)
        }
    }
}

/// Implement serde for a `CanonicalBytes` type: base64 text for
/// human-readable formats, raw bytes otherwise.
#[macro_export]
macro_rules! serialize_deserialize {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&$crate::utils::b64enc(&self.canonical_bytes()))
                } else {
                    serializer.serialize_bytes(&self.canonical_bytes())
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bytes = if deserializer.is_human_readable() {
                    deserializer.deserialize_str($crate::serialization::obj_serde::BytesVisitor)?
                } else {
                    deserializer.deserialize_bytes($crate::serialization::obj_serde::BytesVisitor)?
                };
                $t::from_canonical_bytes(bytes.as_slice()).map_err(serde::de::Error::custom)
            }
        }
    };
}
