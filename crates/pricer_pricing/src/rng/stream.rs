//! Root entropy and the counter-based seed stream derived from it.
//!
//! Seed `i` of a stream is the SplitMix64 output at position `i + 1` from
//! the root state, so it depends only on `(root, i)`. Spawning in any order,
//! from any thread, yields the same seeds.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

/// SplitMix64 state increment (golden ratio).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Root entropy of a simulation run.
///
/// Recording the entropy of a run is enough to reproduce it bit for bit.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::Entropy;
///
/// let entropy = Entropy::new(42);
/// assert_eq!(entropy.value(), 42);
/// assert_eq!(entropy.to_string(), "0x000000000000002a");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Entropy(u64);

impl Entropy {
    /// Wraps a fixed entropy value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Draws fresh entropy from the operating system.
    pub fn fresh() -> Self {
        Self(OsRng.next_u64())
    }

    /// Raw entropy value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Entropy {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Splittable stream of iteration seeds.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::{Entropy, SeedStream};
///
/// let stream = SeedStream::new(Entropy::new(7));
/// let seeds = stream.spawn(4);
/// assert_eq!(seeds[2], stream.seed(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedStream {
    entropy: Entropy,
}

impl SeedStream {
    /// Creates the stream rooted at `entropy`.
    #[inline]
    pub fn new(entropy: Entropy) -> Self {
        Self { entropy }
    }

    /// Root entropy.
    #[inline]
    pub fn entropy(&self) -> Entropy {
        self.entropy
    }

    /// Seed for stream position `index`.
    #[inline]
    pub fn seed(&self, index: u64) -> u64 {
        let state = self
            .entropy
            .value()
            .wrapping_add(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
        mix64(state)
    }

    /// Seeds for positions `0..n`.
    pub fn spawn(&self, n: usize) -> Vec<u64> {
        (0..n as u64).map(|i| self.seed(i)).collect()
    }
}

/// SplitMix64 finaliser.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
