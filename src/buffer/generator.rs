//! Pseudo-random sized buffers filled with a self-describing pattern
//!
//! Every buffer is filled with `"<len> <len> <len> ..."` so a truncated or
//! corrupted buffer is easy to spot in a packet capture or hex dump.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Longest possible pattern: 20 digits of `usize::MAX` plus the trailing space.
const MAX_PATTERN_LEN: usize = 21;

/// Produces buffers whose length is drawn uniformly from `[min_size, max_size)`,
/// reusing a single backing allocation of `max_size` bytes.
pub struct BufferGenerator {
    reuse: Vec<u8>,
    min_size: usize,
    max_size: usize,
    rng: StdRng,
}

impl BufferGenerator {
    /// Create a generator seeded from the OS entropy source
    pub fn new(min_size: usize, max_size: usize) -> Self {
        Self::with_rng(min_size, max_size, StdRng::from_entropy())
    }

    /// Create a generator with a fixed seed (reproducible sizes)
    pub fn with_seed(min_size: usize, max_size: usize, seed: u64) -> Self {
        Self::with_rng(min_size, max_size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min_size: usize, max_size: usize, rng: StdRng) -> Self {
        debug_assert!(min_size < max_size, "empty size range");
        Self {
            reuse: vec![0u8; max_size],
            min_size,
            max_size,
            rng,
        }
    }

    /// Fill the backing storage with a freshly sized buffer and return it
    pub fn next_buffer(&mut self) -> &[u8] {
        generate(&mut self.rng, &mut self.reuse, self.min_size, self.max_size)
    }
}

/// Draw a size from `[min_size, max_size)` and fill `reuse[..size]` with the size pattern.
///
/// `reuse` must be at least `max_size` bytes long; no allocation happens here.
pub fn generate<'a, R: Rng + ?Sized>(
    rng: &mut R,
    reuse: &'a mut [u8],
    min_size: usize,
    max_size: usize,
) -> &'a [u8] {
    let size = rng.gen_range(min_size..max_size);
    sized_buffer(reuse, size)
}

/// Fill `reuse[..size]` with `"<size> "` repeated, the last copy possibly partial.
pub fn sized_buffer(reuse: &mut [u8], size: usize) -> &[u8] {
    let mut pattern = [0u8; MAX_PATTERN_LEN];
    let pattern_len = write_pattern(size, &mut pattern);

    let buf = &mut reuse[..size];
    let mut done = pattern_len.min(size);
    buf[..done].copy_from_slice(&pattern[..done]);

    // The filled prefix is always a whole number of patterns, so doubling it
    // keeps the period intact.
    while done < size {
        let n = done.min(size - done);
        buf.copy_within(0..n, done);
        done += n;
    }
    buf
}

/// Parse the leading decimal token of a generated buffer
pub fn leading_size(buf: &[u8]) -> Option<usize> {
    let end = buf.iter().position(|&b| b == b' ').unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).ok()?.parse().ok()
}

fn write_pattern(size: usize, out: &mut [u8; MAX_PATTERN_LEN]) -> usize {
    let mut digits = [0u8; MAX_PATTERN_LEN - 1];
    let mut n = size;
    let mut count = 0;
    loop {
        digits[count] = b'0' + (n % 10) as u8;
        count += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    for (i, digit) in digits[..count].iter().rev().enumerate() {
        out[i] = *digit;
    }
    out[count] = b' ';
    count + 1
}
