/// Solana address well-formedness check

/// Length in bytes of a Solana public key
pub const PUBKEY_LENGTH: usize = 32;

/// Returns true when `candidate` is base58 that decodes to exactly 32 bytes.
///
/// This is a structural check only; whether the key lies on the ed25519
/// curve is irrelevant for resolution (program-derived addresses are valid
/// targets too).
pub fn is_valid_address(candidate: &str) -> bool {
    // Base58 of 32 bytes is never longer than 44 characters
    if candidate.is_empty() || candidate.len() > 44 {
        return false;
    }

    match bs58::decode(candidate).into_vec() {
        Ok(bytes) => bytes.len() == PUBKEY_LENGTH,
        Err(_) => false,
    }
}
