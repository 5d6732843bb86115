//! Public ad codes and temporary moderation ids.
//!
//! Neither is globally unique. The pending queue re-rolls a temporary id that
//! collides with an item still waiting for moderation.

use rand::Rng;

const CODE_PREFIX: &str = "E-";
const CODE_DIGITS: usize = 5;

const TEMP_PREFIX: &str = "TEMP-";
const TEMP_LEN: usize = 8;
const TEMP_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Permanent public code, e.g. `E-04817`
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..CODE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{}{}", CODE_PREFIX, digits)
}

/// Temporary id for a pending item, e.g. `TEMP-7Q2XK9AB`
pub fn generate_temp_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TEMP_LEN)
        .map(|_| char::from(TEMP_ALPHABET[rng.gen_range(0..TEMP_ALPHABET.len())]))
        .collect();
    format!("{}{}", TEMP_PREFIX, suffix)
}

pub fn is_code(value: &str) -> bool {
    value
        .strip_prefix(CODE_PREFIX)
        .is_some_and(|rest| rest.len() == CODE_DIGITS && rest.bytes().all(|b| b.is_ascii_digit()))
}

pub fn is_temp_id(value: &str) -> bool {
    value
        .strip_prefix(TEMP_PREFIX)
        .is_some_and(|rest| rest.len() == TEMP_LEN && rest.bytes().all(|b| TEMP_ALPHABET.contains(&b)))
}
