//! Fate
//!
//! The weighted outcome shared by gambling and robbing.

use rand::distributions::Distribution;
use rand::Rng;

const FAIL_WEIGHT: u32 = 50;
const SUCCESS_WEIGHT: u32 = 48;
const LUCKY_WEIGHT: u32 = 2;
const TOTAL_WEIGHT: u32 = FAIL_WEIGHT + SUCCESS_WEIGHT + LUCKY_WEIGHT;

const _: () = assert!(TOTAL_WEIGHT == 100, "fate weights are percentages");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fate {
    Fail,
    Success,
    Lucky,
}

impl Fate {
    /// Draw one outcome with probabilities 0.50 / 0.48 / 0.02.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Fate {
        FateWeights.sample(rng)
    }

    /// Outcome for a roll in `0..100`
    fn from_roll(roll: u32) -> Fate {
        if roll < FAIL_WEIGHT {
            Fate::Fail
        } else if roll < FAIL_WEIGHT + SUCCESS_WEIGHT {
            Fate::Success
        } else {
            Fate::Lucky
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Fate::Fail => "fail",
            Fate::Success => "success",
            Fate::Lucky => "lucky",
        }
    }
}

/// The fixed fail / success / lucky distribution
#[derive(Debug, Clone, Copy, Default)]
pub struct FateWeights;

impl Distribution<Fate> for FateWeights {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Fate {
        Fate::from_roll(rng.gen_range(0..TOTAL_WEIGHT))
    }
}
