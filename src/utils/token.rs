use rand::RngCore;

/// Generate a 128-bit random identifier, hex-encoded.
///
/// Used for session ids and CSRF tokens.
pub fn generate() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
