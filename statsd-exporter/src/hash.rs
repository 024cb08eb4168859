use std::fmt;

use crate::event::Labels;

// Neither byte can appear in UTF-8, so the encoding below is unambiguous.
const FIELD_SEPARATOR: u8 = 0xFF;
const KEY_VALUE_SEPARATOR: u8 = 0xFE;

/// Identity of a time series: a metric name plus its label set.
///
/// Keys are 128-bit digests, wide enough that two distinct series colliding is not a practical
/// concern.  The registry relies on this and performs no secondary equality check.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MetricKey(u128);

impl fmt::Debug for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetricKey({:032x})", self.0)
    }
}

/// Computes the identity key for the given metric name and labels.
///
/// Labels are fed to the hasher in key order, so the order in which tags were received never
/// affects the result.
pub fn hash_name_and_labels(name: &str, labels: &Labels) -> MetricKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&[FIELD_SEPARATOR]);

    // `Labels` iterates in key order already; this is what makes the key canonical.
    for (key, value) in labels {
        hasher.update(key.as_bytes());
        hasher.update(&[KEY_VALUE_SEPARATOR]);
        hasher.update(value.as_bytes());
        hasher.update(&[FIELD_SEPARATOR]);
    }

    let digest = hasher.finalize();
    let mut truncated = [0u8; 16];
    truncated.copy_from_slice(&digest.as_bytes()[..16]);
    MetricKey(u128::from_le_bytes(truncated))
}
