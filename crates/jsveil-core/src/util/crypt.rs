//! Encodings for string-array entries.
//!
//! The runtime decoder emitted next to the array uses a lowercase-first
//! base64 alphabet, so entries are encoded with the same alphabet here.

use crate::config::StringArrayEncoding;
use base64::alphabet::Alphabet;
use base64::engine::{general_purpose, GeneralPurpose};
use base64::Engine;

const ALPHABET: Alphabet =
    match Alphabet::new("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+/") {
        Ok(alphabet) => alphabet,
        Err(_) => unreachable!(),
    };

const ENGINE: GeneralPurpose = GeneralPurpose::new(&ALPHABET, general_purpose::PAD);

pub fn btoa(input: &[u8]) -> String {
    ENGINE.encode(input)
}

/// RC4 keystream applied to `input`. Symmetric: applying it twice with the
/// same key restores the input.
pub fn rc4(input: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return input.to_vec();
    }

    let mut state: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let mut i = 0u8;
    let mut j = 0u8;
    input
        .iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            let k = state[(state[i as usize].wrapping_add(state[j as usize])) as usize];
            byte ^ k
        })
        .collect()
}

/// Encoded form of a string-array value as stored in the array.
pub fn encode(value: &str, encoding: StringArrayEncoding, decode_key: Option<&str>) -> String {
    match encoding {
        StringArrayEncoding::None => value.to_string(),
        StringArrayEncoding::Base64 => btoa(value.as_bytes()),
        StringArrayEncoding::Rc4 => {
            let key = decode_key.unwrap_or_default();
            btoa(&rc4(value.as_bytes(), key.as_bytes()))
        }
    }
}
