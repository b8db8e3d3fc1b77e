//! Deterministic key generation for extracted text.
//!
//! Keys are short base-36 hashes of the text. The algorithm matches the
//! locale files produced by existing tooling, so a text always maps to the
//! same key across runs and across implementations.

use std::fmt;
use std::sync::Arc;

/// Default key length.
pub const DEFAULT_KEY_LENGTH: usize = 6;

const HASH_SEED: i32 = 5381;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Hash `text` into a fixed-length base-36 key.
///
/// Each UTF-16 code unit is rolled in as `hash = (hash * 33) ^ unit` with
/// 32-bit wrap-around, the absolute value is base-36 encoded, then padded
/// with `0` and truncated to the last `len` characters.
///
/// ```
/// use i18n_extract::core::key::generate_id;
///
/// assert_eq!(generate_id("你好", 6), "03tpnc");
/// assert_eq!(generate_id("你好", 6), generate_id("你好", 6));
/// ```
pub fn generate_id(text: &str, len: usize) -> String {
    let hash = text
        .encode_utf16()
        .fold(HASH_SEED, |hash, unit| hash.wrapping_mul(33) ^ i32::from(unit));

    let encoded = to_base36(i64::from(hash).unsigned_abs());
    let padded = format!("{:0>len$}", encoded, len = len);
    padded[padded.len() - len..].to_string()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Only ASCII digits are pushed.
    String::from_utf8_lossy(&digits).into_owned()
}

/// Strategy for turning extracted text into a map key.
///
/// Implementations must be deterministic: the same text must always produce
/// the same key, otherwise incremental merges lose entries.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, text: &str) -> String;
}

/// The built-in hash generator.
#[derive(Debug, Clone, Copy)]
pub struct HashKeyGenerator {
    len: usize,
}

impl HashKeyGenerator {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for HashKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}

impl KeyGenerator for HashKeyGenerator {
    fn generate(&self, text: &str) -> String {
        generate_id(text, self.len)
    }
}

/// A user-supplied generator that receives the text and the default generator.
pub struct CustomKeyGenerator<F> {
    default: HashKeyGenerator,
    func: F,
}

impl<F> CustomKeyGenerator<F>
where
    F: Fn(&str, &HashKeyGenerator) -> String + Send + Sync,
{
    pub fn new(default: HashKeyGenerator, func: F) -> Self {
        Self { default, func }
    }
}

impl<F> KeyGenerator for CustomKeyGenerator<F>
where
    F: Fn(&str, &HashKeyGenerator) -> String + Send + Sync,
{
    fn generate(&self, text: &str) -> String {
        (self.func)(text, &self.default)
    }
}

impl<F> fmt::Debug for CustomKeyGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomKeyGenerator")
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

pub type SharedKeyGenerator = Arc<dyn KeyGenerator>;
