use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upper bound the API accepts for comma-separated address lookups.
pub const MAX_TOKEN_ADDRESSES: usize = 30;

/// Chain identifier as used in endpoint paths, e.g. `ethereum` or `solana`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(String);

impl ChainId {
    /// Trims surrounding whitespace; the API is case-sensitive so case is preserved.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        non_empty(input, "chain id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ChainId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.0
    }
}

/// Token or pair address. Checksummed and lowercase forms are both accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAddress(String);

impl TokenAddress {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        non_empty(input, "token address").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TokenAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TokenAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenAddress> for String {
    fn from(value: TokenAddress) -> Self {
        value.0
    }
}

/// Between one and [`MAX_TOKEN_ADDRESSES`] addresses, order preserved, duplicates kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAddresses(Vec<TokenAddress>);

impl TokenAddresses {
    pub fn parse<I, S>(inputs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = inputs
            .into_iter()
            .map(|input| TokenAddress::parse(input.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if addresses.is_empty() {
            return Err(ValidationError::NoAddresses);
        }
        if addresses.len() > MAX_TOKEN_ADDRESSES {
            return Err(ValidationError::TooManyAddresses {
                count: addresses.len(),
                max: MAX_TOKEN_ADDRESSES,
            });
        }

        Ok(Self(addresses))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenAddress> {
        self.0.iter()
    }

    /// Comma-joined path segment.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(TokenAddress::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn non_empty(input: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}
