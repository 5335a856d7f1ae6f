use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// 7-bag piece sequence generator.
///
/// Draws come from an internal bag that starts empty: whenever it runs dry it
/// is refilled with all seven kinds exactly once and shuffled (Fisher–Yates
/// via [`SliceRandom::shuffle`]), then one kind is popped. Every window of 7
/// draws aligned to a bag boundary therefore contains each kind exactly once,
/// and no kind can be absent for more than 12 consecutive draws.
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    bag: Vec<PieceKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a bag with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Creates a bag with a specific seed for a deterministic sequence.
    #[must_use]
    pub fn with_seed(seed: BagSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: Vec::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws the next piece kind, refilling and shuffling the bag when empty.
    pub fn pop_next(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            let mut refill = PieceKind::ALL;
            refill.shuffle(&mut self.rng);
            self.bag.extend(refill);
        }
        self.bag.pop().expect("bag refilled above")
    }

    /// Draws the next `n` piece kinds, used to populate a preview queue.
    pub fn queue(&mut self, n: usize) -> Vec<PieceKind> {
        (0..n).map(|_| self.pop_next()).collect()
    }
}

/// Seed for deterministic piece generation.
///
/// A 16-byte PCG32 seed; equal seeds produce equal draw sequences. The serde
/// and string representation is 32 hex characters, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagSeed([u8; 16]);

impl BagSeed {
    fn from_hex(hex: &str) -> Result<Self, String> {
        if hex.len() != 32 {
            return Err(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex.len()
            ));
        }
        let num = u128::from_str_radix(hex, 16)
            .map_err(|e| format!("invalid seed: {hex} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl std::fmt::Display for BagSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl std::str::FromStr for BagSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for BagSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex = String::with_capacity(2 * self.0.len());
        write!(&mut hex, "{self}").expect("writing to a String cannot fail");
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for BagSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl Distribution<BagSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BagSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BagSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seed(byte: u8) -> BagSeed {
        BagSeed([byte; 16])
    }

    #[test]
    fn each_bag_contains_every_kind_once() {
        let mut bag = PieceBag::with_seed(seed(0x42));
        for window in 0..8 {
            let draws: HashSet<PieceKind> = (0..PieceKind::LEN).map(|_| bag.pop_next()).collect();
            assert_eq!(draws.len(), PieceKind::LEN, "window {window}");
        }
    }

    #[test]
    fn drought_is_bounded_by_twelve_draws() {
        let mut bag = PieceBag::with_seed(seed(0x07));
        let draws: Vec<PieceKind> = (0..2000).map(|_| bag.pop_next()).collect();
        for kind in PieceKind::ALL {
            let mut gap = 0;
            for &draw in &draws {
                if draw == kind {
                    gap = 0;
                } else {
                    gap += 1;
                    assert!(gap <= 12, "{kind:?} absent for {gap} draws");
                }
            }
        }
    }

    #[test]
    fn equal_seeds_produce_equal_sequences() {
        let mut a = PieceBag::with_seed(seed(0x99));
        let mut b = PieceBag::with_seed(seed(0x99));
        for _ in 0..20 {
            assert_eq!(a.pop_next(), b.pop_next());
        }
    }

    #[test]
    fn queue_matches_repeated_draws() {
        let mut a = PieceBag::with_seed(seed(0x10));
        let mut b = PieceBag::with_seed(seed(0x10));
        let queued = a.queue(10);
        let drawn: Vec<PieceKind> = (0..10).map(|_| b.pop_next()).collect();
        assert_eq!(queued, drawn);
    }

    #[test]
    fn seed_hex_round_trips() {
        let original: BagSeed = rand::rng().random();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: BagSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);

        let display = original.to_string();
        assert_eq!(display.len(), 32);
        assert_eq!(display.parse::<BagSeed>().unwrap(), original);
    }

    #[test]
    fn seed_known_values() {
        let zeros = seed(0x00);
        assert_eq!(
            serde_json::to_string(&zeros).unwrap(),
            "\"00000000000000000000000000000000\""
        );
        assert!("not-hex".parse::<BagSeed>().is_err());
        assert!("0123".parse::<BagSeed>().is_err());
    }
}
