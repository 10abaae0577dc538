//! Deterministic seeds for per-step random draws.

use message_rules::Step;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Derive a seed from a step and the parts of a signature (FNV-1a).
///
/// The value must stay stable across runs and platforms.
pub fn derive(step: Step, parts: &[&str]) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };

    feed(&step.to_le_bytes());
    for part in parts {
        feed(part.as_bytes());
        // separator so ("ab", "c") and ("a", "bc") differ
        feed(&[0xff]);
    }
    hash
}
