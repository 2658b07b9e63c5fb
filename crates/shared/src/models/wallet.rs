use serde::{Deserialize, Serialize};

/// Credit score produced by the scoring service, in `[0, 1000]`.
pub type Score = f64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCount {
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityData {
    pub malicious: InteractionCount,
    pub mixer: InteractionCount,
}

/// On-chain features of a wallet as returned by the scoring service.
///
/// Rates (`tx_success_rate`, `delegation_success_rate`) are fractions in
/// `[0, 1]`, balances are denominated in ETH.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletData {
    pub account_age_days: f64,
    pub eth_balance: f64,
    pub tx_count: u64,
    pub tx_success_rate: f64,
    pub token_diversity: u64,
    pub defi_interactions: u64,
    #[serde(rename = "_security_data")]
    pub security_data: SecurityData,
    pub delegation_capacity: f64,
    pub staked_collateral: f64,
    pub reputation_score: f64,
    pub delegation_success_rate: f64,
    pub zkp_usage: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_scorer_payload() {
        let payload = json!({
            "account_age_days": 812.25,
            "eth_balance": 3.5,
            "tx_count": 420,
            "tx_success_rate": 0.97,
            "token_diversity": 12,
            "defi_interactions": 33,
            "_security_data": {
                "malicious": { "count": 1 },
                "mixer": { "count": 0 }
            },
            "delegation_capacity": 55.5,
            "staked_collateral": 1.25,
            "reputation_score": 0.8,
            "delegation_success_rate": 0.9,
            "zkp_usage": true
        });

        let data: WalletData = serde_json::from_value(payload).unwrap();
        assert_eq!(data.tx_count, 420);
        assert_eq!(data.security_data.malicious.count, 1);
        assert_eq!(data.security_data.mixer.count, 0);
        assert!(data.zkp_usage);
    }

    #[test]
    fn test_security_data_keeps_wire_name() {
        let value = serde_json::to_value(WalletData::default()).unwrap();
        assert!(value.get("_security_data").is_some());
        assert!(value.get("security_data").is_none());
    }
}
