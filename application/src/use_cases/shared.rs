//! Shared utilities for use cases.

use rand::SeedableRng;
use rand::rngs::StdRng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// splitmix64 finalizer
fn mix(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Seed for one question, fixed by `(seed, question_id)` alone.
pub(crate) fn question_seed(seed: u64, question_id: &str) -> u64 {
    mix(seed ^ fnv1a(question_id.as_bytes()))
}

/// RNG for one question.
///
/// With a seed the generator depends only on `(seed, question_id)`, so a
/// question draws the same positions whatever order a batch runs in.
pub(crate) fn question_rng(seed: Option<u64>, question_id: &str) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(question_seed(seed, question_id)),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_question_seed_is_a_pure_function() {
        assert_eq!(question_seed(7, "q1"), mix(7 ^ fnv1a(b"q1")));
        assert_ne!(question_seed(7, "q1"), question_seed(7, "q2"));
        assert_ne!(question_seed(7, "q1"), question_seed(8, "q1"));
    }

    #[test]
    fn test_seeded_rng_is_stable_per_question() {
        let a: u64 = question_rng(Some(7), "q1").r#gen();
        let b: u64 = question_rng(Some(7), "q1").r#gen();
        let c: u64 = question_rng(Some(7), "q2").r#gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
