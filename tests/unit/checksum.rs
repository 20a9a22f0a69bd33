//! Checksum arithmetic through the public API.

use guardstack::verify::checksum::{compute, default_hash, mix};
use guardstack::{HashFn, HASH_MOD, HASH_MUL};

fn identity(value: &u64) -> u64 {
    *value
}

#[test]
fn empty_sequence_hashes_to_zero() {
    let empty: [u64; 0] = [];
    assert_eq!(compute(&empty, identity), 0);
}

#[test]
fn single_element_is_hash_mod_p_xor_one() {
    assert_eq!(compute(&[5u64], identity), 5 ^ 1);
    assert_eq!(compute(&[HASH_MOD + 3], identity), 3 ^ 1);
}

#[test]
fn polynomial_matches_hand_computation() {
    // ((1 * 29) + 2) * 29 + 3 = 902, then xor with the length.
    let expected = ((1 * HASH_MUL + 2) * HASH_MUL + 3) ^ 3;
    assert_eq!(compute(&[1u64, 2, 3], identity), expected);
}

#[test]
fn mix_stays_below_modulus() {
    for acc in [0, 1, HASH_MOD - 1] {
        for h in [0, 7, HASH_MOD, u64::MAX] {
            assert!(mix(acc, h) < HASH_MOD, "mix({}, {}) escaped the field", acc, h);
        }
    }
}

#[test]
fn length_is_folded_in() {
    // Zero-hash elements contribute nothing but the count.
    let zero: HashFn<u8> = |_| 0;
    assert_eq!(compute(&[0u8; 4], zero), 4);
    assert_ne!(compute(&[0u8; 4], zero), compute(&[0u8; 5], zero));
}

#[test]
fn default_hash_is_deterministic() {
    let a = default_hash(&"guard".to_string());
    let b = default_hash(&"guard".to_string());
    assert_eq!(a, b);
    assert_ne!(a, default_hash(&"guarD".to_string()));
}
