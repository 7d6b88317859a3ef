use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Verify the `x-line-signature` header: base64-encoded HMAC-SHA256 of
/// the raw request body, keyed with the channel secret.
pub fn verify_signature(body: &[u8], signature: &str, channel_secret: &str) -> bool {
    let mut mac = Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC can take key of any size");

    mac.update(body);
    let expected_signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    signature == expected_signature
}
