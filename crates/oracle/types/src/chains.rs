//! Static chain-selector table

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const SEPOLIA_SELECTOR: u64 = 16_015_286_601_757_825_753;
pub const HEDERA_SELECTOR: u64 = 222_782_988_166_878_823;

/// Cross-chain selector of one chain.
///
/// Selectors routinely exceed `i64::MAX`, which TOML and most environment
/// parsers cannot represent, so they are serialized as decimal strings and
/// accepted as either strings or integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainSelector(pub u64);

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ChainSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Self(value)),
            Raw::Text(text) => text
                .trim()
                .parse::<u64>()
                .map(Self)
                .map_err(|e| serde::de::Error::custom(format!("invalid chain selector '{text}': {e}"))),
        }
    }
}

/// Chain identifier → selector lookup.
///
/// Identifiers are stored lower-cased; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChainSelectorTable(BTreeMap<String, ChainSelector>);

impl<'de> Deserialize<'de> for ChainSelectorTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, ChainSelector>::deserialize(deserializer)?;
        Ok(Self::new(raw.into_iter().map(|(chain, selector)| (chain, selector.0))))
    }
}

impl Default for ChainSelectorTable {
    fn default() -> Self {
        Self::new([("sepolia", SEPOLIA_SELECTOR), ("hedera", HEDERA_SELECTOR)])
    }
}

impl ChainSelectorTable {
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, u64)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(chain, selector)| (chain.into().to_lowercase(), ChainSelector(selector)))
                .collect(),
        )
    }

    pub fn resolve(&self, chain: &str) -> Option<ChainSelector> {
        self.0.get(&chain.trim().to_lowercase()).copied()
    }

    pub fn contains(&self, chain: &str) -> bool {
        self.resolve(chain).is_some()
    }

    /// Supported identifiers in stable (sorted) order.
    pub fn supported(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let table = ChainSelectorTable::default();
        assert_eq!(table.resolve("Sepolia"), Some(ChainSelector(SEPOLIA_SELECTOR)));
        assert_eq!(table.resolve(" HEDERA "), Some(ChainSelector(HEDERA_SELECTOR)));
        assert!(table.resolve("polygon").is_none());
    }

    #[test]
    fn supported_lists_every_configured_chain() {
        let table = ChainSelectorTable::new([("Sepolia", 1), ("arbitrum", 2), ("hedera", 3)]);
        assert_eq!(table.supported(), vec!["arbitrum", "hedera", "sepolia"]);
    }

    #[test]
    fn selectors_above_i64_round_trip_as_strings() {
        let json = serde_json::to_string(&ChainSelectorTable::default()).unwrap();
        assert!(json.contains("\"16015286601757825753\""));

        let parsed: ChainSelectorTable =
            serde_json::from_str(r#"{"sepolia":"16015286601757825753","local":7}"#).unwrap();
        assert_eq!(parsed.resolve("sepolia"), Some(ChainSelector(SEPOLIA_SELECTOR)));
        assert_eq!(parsed.resolve("local"), Some(ChainSelector(7)));
    }

    #[test]
    fn deserialized_identifiers_are_lower_cased() {
        let parsed: ChainSelectorTable =
            serde_json::from_str(r#"{"Sepolia":"1","hedera":"2"}"#).unwrap();
        assert_eq!(parsed.resolve("sepolia"), Some(ChainSelector(1)));
        assert_eq!(parsed.supported(), vec!["hedera", "sepolia"]);

        let json = serde_json::to_string(&parsed).unwrap();
        let reparsed: ChainSelectorTable = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, parsed);
    }
}
