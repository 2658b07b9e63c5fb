use alloy::primitives::Address;
use std::str::FromStr;

const ADDRESS_HEX_LEN: usize = 40;

/// Validates a candidate address string and returns the parsed address.
///
/// Accepts 40 hex digits with an optional `0x` prefix. Single-case input is
/// accepted as-is; mixed-case input must carry a valid EIP-55 checksum.
/// Invalid input yields `None`, it is a common case rather than an error.
pub fn validate_address(candidate: &str) -> Option<Address> {
    let candidate = candidate.trim();
    let body = candidate
        .strip_prefix("0x")
        .or_else(|| candidate.strip_prefix("0X"))
        .unwrap_or(candidate);

    if body.len() != ADDRESS_HEX_LEN || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let address = Address::from_str(body).ok()?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != format!("0x{body}") {
        return None;
    }

    Some(address)
}

/// Canonical textual form used for caching, file names and reports.
pub fn checksummed(address: &Address) -> String {
    address.to_checksum(None)
}
