//! `where` clauses for the county parcel layer.

use crate::GisError;

/// Returns `address` uppercased with everything but ASCII letters,
/// digits and spaces removed.
pub fn normalize_address(address: &str) -> String {
    address
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_ascii_uppercase()
}

/// Returns the parcel layer `where` clause matching an address by
/// house number and the first word of the street name.
pub fn address_where(address: &str) -> Result<String, GisError> {
    let normalized = normalize_address(address);
    let mut tokens = normalized.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(house), Some(street)) => Ok(format!(
            "SITUS_HOUSE_NUMBER LIKE '{house}%' AND SITUS_STREET_NAME LIKE '{street}%'"
        )),
        _ => Err(GisError::Address(address.to_owned())),
    }
}

/// Returns `apn` with dashes and whitespace removed, rejecting
/// anything that isn't all digits.
pub fn normalize_apn(apn: &str) -> Result<String, GisError> {
    let digits: String = apn
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(GisError::Apn(apn.to_owned()));
    }
    Ok(digits)
}

pub fn apn_where(apn: &str) -> Result<String, GisError> {
    let apn = normalize_apn(apn)?;
    Ok(format!("APN='{apn}'"))
}
