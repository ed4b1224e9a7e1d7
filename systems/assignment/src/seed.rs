use nexus_randomizer_core::RandomizerAssignment;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Derives a generator seed from a human readable label.
///
/// The label is hashed with SHA-256 and the first eight digest bytes are read
/// little-endian, so equal labels always yield equal seeds.
#[must_use]
pub fn seed_from_label(label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

/// Seeded generator for a label, as used by every randomizer entry point.
#[must_use]
pub fn rng_from_label(label: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed_from_label(label))
}

/// Short hexadecimal digest identifying an assignment.
///
/// Covers every slot's level, door visual and key in order, so two runs that
/// place anything differently get different fingerprints.
#[must_use]
pub fn assignment_fingerprint(assignment: &RandomizerAssignment) -> String {
    let mut hasher = Sha256::new();
    for level in &assignment.levels {
        if let Some(level) = level {
            hasher.update(level.as_str().as_bytes());
        }
        hasher.update([0]);
    }
    for door in &assignment.doors {
        hasher.update([door.get()]);
    }
    for key in &assignment.keys {
        hasher.update(key.to_le_bytes());
    }
    let digest = hasher.finalize();
    digest[..4].iter().map(|byte| format!("{byte:02x}")).collect()
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
