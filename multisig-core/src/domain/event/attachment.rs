use crate::domain::event::seal::SealEvent;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

const B64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn int_to_b64(mut value: usize, width: usize) -> String {
    let mut out = vec![b'A'; width];
    for slot in out.iter_mut().rev() {
        *slot = B64_ALPHABET[value % 64];
        value /= 64;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// `-A##` counter for `count` controller-indexed signatures.
pub fn signature_counter(count: usize) -> String {
    format!("-A{}", int_to_b64(count, 2))
}

fn seqner(sn: &str) -> String {
    let value = u128::from_str_radix(sn, 16).unwrap_or_default();
    let mut raw = vec![0u8, 0u8];
    raw.extend_from_slice(&value.to_be_bytes());
    format!("0A{}", &URL_SAFE_NO_PAD.encode(&raw)[2..])
}

/// Attachment stream for an event: indexed signatures, optionally followed by the
/// source seal of the signing group's latest establishment event.
pub fn messagize(sigs: &[String], seal: Option<&SealEvent>) -> String {
    let mut atc = signature_counter(sigs.len());
    for sig in sigs {
        atc.push_str(sig);
    }
    if let Some(seal) = seal {
        atc.push_str("-FAB");
        atc.push_str(&seal.i);
        atc.push_str(&seqner(&seal.s));
        atc.push_str(&seal.d);
    }
    atc
}
