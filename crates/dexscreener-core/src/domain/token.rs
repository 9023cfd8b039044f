use serde::{Deserialize, Serialize};

/// External link attached to a token profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLink {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}

/// Entry of the latest token profiles listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProfile {
    pub url: String,
    pub chain_id: String,
    pub token_address: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::domain::pair::null_as_default")]
    pub links: Vec<TokenLink>,
}

/// Entry of the boosted token listings (latest and top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostedToken {
    pub url: String,
    pub chain_id: String,
    pub token_address: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::domain::pair::null_as_default")]
    pub links: Vec<TokenLink>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn profile_decodes_links_and_optional_fields() {
        let profile: TokenProfile = serde_json::from_value(json!({
            "url": "https://dexscreener.com/solana/abc",
            "chainId": "solana",
            "tokenAddress": "abc",
            "icon": "https://cdn.example/icon.png",
            "links": [
                {"type": "twitter", "url": "https://x.com/abc"},
                {"label": "Website", "url": "https://abc.example"}
            ]
        }))
        .expect("profile should decode");

        assert_eq!(profile.chain_id, "solana");
        assert_eq!(profile.header, None);
        assert_eq!(profile.links.len(), 2);
        assert_eq!(profile.links[0].kind.as_deref(), Some("twitter"));
        assert_eq!(profile.links[1].label.as_deref(), Some("Website"));
    }

    #[test]
    fn boosted_token_tolerates_null_links() {
        let token: BoostedToken = serde_json::from_value(json!({
            "url": "https://dexscreener.com/base/0x1",
            "chainId": "base",
            "tokenAddress": "0x1",
            "amount": 100,
            "totalAmount": 500,
            "links": null
        }))
        .expect("boosted token should decode");

        assert_eq!(token.amount, Some(100.0));
        assert_eq!(token.total_amount, Some(500.0));
        assert!(token.links.is_empty());
    }
}
