use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALL_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Generates a specified number of random passwords with uniform distribution.
/// Uses a fixed seed for reproducible benchmark results.
pub fn generate_random_passwords(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let length = rng.gen_range(8..=64);
            (0..length)
                .map(|_| ALL_CHARS[rng.gen_range(0..ALL_CHARS.len())] as char)
                .collect()
        })
        .collect()
}

/// Builds a range body shaped like a busy prefix: `count` random 35 character
/// suffixes with CRLF terminators.
pub fn generate_range_body(count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let mut body = String::with_capacity(count * 44);
    for _ in 0..count {
        for _ in 0..35 {
            body.push(HEX_CHARS[rng.gen_range(0..16)] as char);
        }
        body.push(':');
        body.push_str(&rng.gen_range(1..100_000u32).to_string());
        body.push_str("\r\n");
    }
    body
}
