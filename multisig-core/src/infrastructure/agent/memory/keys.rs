//! Key material of simulated controllers.
//!
//! Keys are random 32-byte values carrying the Ed25519 `D` code, but they are not Ed25519
//! keys. A "signature" is a Blake3 XOF over the key and the event digest, so it is not
//! verifiable against the public key by anyone, including the hub. The hub accepts a
//! contribution when the contributor's current key is listed in the event at its index.

use crate::foundation::util::digest_said;
use crate::foundation::{Prefix, Said};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

const B64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

#[derive(Clone, Debug)]
pub(crate) struct Controller {
    pub agent: Prefix,
    pub alias: String,
    pub current_key: String,
    pub next_key: String,
}

impl Controller {
    pub fn generate(agent: Prefix, alias: &str) -> Self {
        Self { agent, alias: alias.to_string(), current_key: random_key(), next_key: random_key() }
    }

    /// Digest committing to the next key.
    pub fn next_digest(&self) -> String {
        next_digest(&self.next_key)
    }

    /// Promote the pre-committed next key.
    pub fn rotate(&mut self) {
        self.current_key = std::mem::replace(&mut self.next_key, random_key());
    }

    pub fn sign(&self, index: usize, digest: &Said) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.current_key.as_bytes());
        hasher.update(digest.as_bytes());
        let mut raw = [0u8; 64];
        hasher.finalize_xof().fill(&mut raw);
        format!("A{}{}", B64[index % 64] as char, &URL_SAFE_NO_PAD.encode(raw)[..86])
    }
}

pub(crate) fn random_key() -> String {
    let mut raw = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut raw);
    let mut padded = vec![0u8];
    padded.extend_from_slice(&raw);
    format!("D{}", &URL_SAFE_NO_PAD.encode(&padded)[1..])
}

pub(crate) fn next_digest(key: &str) -> String {
    digest_said(key.as_bytes()).to_string()
}
