//! Random block-key generation.

use rand::Rng;

use crate::block::{BlockKey, BlockMap};

const KEY_LEN: usize = 8;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

/// Draw a random 8-character base-32 key from `rng`.
pub fn generate_key<R: Rng + ?Sized>(rng: &mut R) -> BlockKey {
    (0..KEY_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// A key guaranteed absent from `map`'s current key space.
///
/// Collisions are astronomically unlikely (32^8 key space) but the draw is
/// retried anyway so the uniqueness guarantee is unconditional.
pub fn fresh_key(map: &BlockMap) -> BlockKey {
    let mut rng = rand::thread_rng();
    loop {
        let key = generate_key(&mut rng);
        if !map.contains_key(&key) {
            return key;
        }
    }
}
