use shared::models::{Score, WalletData};
use std::fmt;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    /// Band lower bounds are inclusive.
    pub fn from_score(score: Score) -> Self {
        if score >= 850.0 {
            Self::Excellent
        } else if score >= 700.0 {
            Self::VeryGood
        } else if score >= 550.0 {
            Self::Good
        } else if score >= 400.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn interpretation(&self) -> &'static str {
        match self {
            Self::Excellent => "💎 Excellent - Exceptional creditworthiness",
            Self::VeryGood => "👍 Very Good - Strong financial history",
            Self::Good => "🆗 Good - Reliable with minor risks",
            Self::Fair => "⚠️ Fair - Elevated risk factors",
            Self::Poor => "❌ Poor - High risk profile",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interpretation())
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Renders the plain-text report for one wallet. Identical inputs always give
/// byte-identical output.
pub fn render_report(address: &str, data: &WalletData, score: Score) -> String {
    let security = &data.security_data;
    let lines = [
        format!("Address: {address}"),
        String::new(),
        "=== ACCOUNT OVERVIEW ===".to_string(),
        format!("• Age: {:.1} days", data.account_age_days),
        format!("• Balance: {:.4} ETH", data.eth_balance),
        format!("• Transactions: {}", data.tx_count),
        format!("• Success Rate: {}", percent(data.tx_success_rate)),
        format!("• Token Diversity: {}", data.token_diversity),
        format!("• DeFi Interactions: {}", data.defi_interactions),
        String::new(),
        "=== SECURITY ANALYSIS ===".to_string(),
        format!("• Malicious Interactions: {}", security.malicious.count),
        String::new(),
        format!("• Mixer Transactions: {}", security.mixer.count),
        String::new(),
        "=== REPUTATION-BACKED DELEGATION ===".to_string(),
        format!("• Delegation Capacity: {:.2} points", data.delegation_capacity),
        format!("• Staked Collateral: {:.4} ETH", data.staked_collateral),
        format!("• Reputation Score: {:.2}/1.0", data.reputation_score),
        format!(
            "• Successful Delegations: {}",
            percent(data.delegation_success_rate)
        ),
        format!(
            "• Uses ZKP: {}",
            if data.zkp_usage { "Yes" } else { "No" }
        ),
        String::new(),
        "=".repeat(RULE_WIDTH),
        format!("💳 FINAL CREDIT SCORE: {}/1000", score.trunc() as i64),
        ScoreBand::from_score(score).to_string(),
    ];

    lines.join("\n")
}
