//! Token parameters fixed at ledger creation.

use serde::{Deserialize, Serialize};

/// Raw units per whole token (18 decimals).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Immutable token metadata and supply cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    /// Human-readable token name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Ticker symbol.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Number of decimal places in the display unit.
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Upper bound on total supply, in raw units.
    #[serde(default = "default_cap", with = "raw_amount")]
    pub cap: u128,
}

fn default_name() -> String {
    "NanoByte Token".to_string()
}

fn default_symbol() -> String {
    "NBT".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_cap() -> u128 {
    1_000_000_000 * TOKEN_UNIT
}

impl TokenParams {
    /// Parameters with the default metadata and an explicit cap.
    pub fn with_cap(cap: u128) -> Self {
        Self {
            cap,
            ..Self::default()
        }
    }

    /// Check that the parameters describe a usable token.
    ///
    /// `10^decimals` must fit in a `u128` for unit formatting to work.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("token name must not be empty".into());
        }
        if self.symbol.trim().is_empty() {
            return Err("token symbol must not be empty".into());
        }
        if self.decimals > 38 {
            return Err(format!("decimals {} exceeds 38", self.decimals));
        }
        if self.cap == 0 {
            return Err("cap must be non-zero".into());
        }
        Ok(())
    }
}

/// Raw amounts as decimal strings.
///
/// TOML integers are 64-bit, and a realistic cap in 18-decimal units does
/// not fit. Plain integers are still accepted on input.
pub mod raw_amount {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_str(RawAmountVisitor)
    }

    struct RawAmountVisitor;

    impl<'de> Visitor<'de> for RawAmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.trim().replace('_', "").parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v as u128)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(E::custom)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }
    }
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            cap: default_cap(),
        }
    }
}
