use crate::foundation::constants::PASSCODE_LENGTH;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};

/// Random salt-sized nonce rendered with the `0A` code of a 128-bit seed.
pub fn random_nonce() -> String {
    let mut raw = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut raw);
    let mut padded = vec![0u8, 0u8];
    padded.extend_from_slice(&raw);
    let encoded = URL_SAFE_NO_PAD.encode(&padded);
    format!("0A{}", &encoded[2..])
}

pub fn random_passcode() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(PASSCODE_LENGTH).map(char::from).collect()
}
