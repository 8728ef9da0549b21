//! Utility functions for identifiers and hashing

use crate::error::{Result, WorkflowError};
use bech32::Bech32m;
use uuid7::uuid7;

/// Human readable prefix for leave request identifiers.
pub const LEAVE_HRP: &str = "leave";

// construct a unique time-ordered id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> Result<String> {
    let hrp = bech32::Hrp::parse(hrp).map_err(|e| WorkflowError::Identifier(e.to_string()))?;
    let encoded = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())
        .map_err(|e| WorkflowError::Identifier(e.to_string()))?;
    Ok(encoded)
}

pub fn new_request_id() -> Result<String> {
    new_uuid_to_bech32(LEAVE_HRP)
}

// hash of a cbor encoded value, as hex
pub fn cbor_hash<T: minicbor::Encode<()>>(value: &T) -> Result<(String, Vec<u8>)> {
    let cbor = minicbor::to_vec(value)?;
    let hash = sha256::digest(&cbor);
    Ok((hash, cbor))
}
