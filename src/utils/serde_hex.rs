//! Serde helpers - digests and item bytes as lowercase hex strings

use crate::core::types::HashDigest;
use crate::utils::hash::digest_from_hex;

use alloc::string::String;
use alloc::vec::Vec;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub mod digest {
    use super::*;

    pub fn serialize<S: Serializer>(
        digest: &HashDigest,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(digest))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashDigest, D::Error> {
        let text = String::deserialize(deserializer)?;
        digest_from_hex(&text).map_err(D::Error::custom)
    }
}

pub mod digest_vec {
    use super::*;

    pub fn serialize<S: Serializer>(
        digests: &[HashDigest],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(digests.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<HashDigest>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|text| digest_from_hex(text).map_err(D::Error::custom))
            .collect()
    }
}

pub mod bytes_vec {
    use super::*;

    pub fn serialize<S: Serializer>(
        items: &[Vec<u8>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|text| hex::decode(text).map_err(D::Error::custom))
            .collect()
    }
}
