use arrayvec::ArrayVec;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use std::error::Error;
use std::fmt;

use crate::PuzzleError;

#[derive(Debug, PartialEq, Eq)]
pub enum StoneError {
    NoStones,
    BadStone {token: String},
}

impl Error for StoneError {}
impl fmt::Display for StoneError {fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
        StoneError::NoStones => write!(f, "no stones in input"),
        StoneError::BadStone {token} => write!(f, "cannot parse {:?} as a non-negative integer", token),
    }
}}

pub fn parse_stones(input: &str) -> Result<Vec<BigUint>, StoneError> {
    let stones = input.split_ascii_whitespace().map(|token| {
        // BigUint::from_str also takes '+' and '_', which are not stones
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoneError::BadStone {token: token.to_owned()});
        }
        token.parse::<BigUint>().map_err(|_| StoneError::BadStone {token: token.to_owned()})
    }).collect::<Result<Vec<_>, _>>()?;
    if stones.is_empty() {return Err(StoneError::NoStones)};
    Ok(stones)
}

pub fn blink(stone: &BigUint) -> ArrayVec<BigUint, 2> {
    let mut out = ArrayVec::new();
    if stone.is_zero() {
        out.push(BigUint::one());
        return out;
    }
    let digits = stone.to_str_radix(10).len();
    if digits % 2 == 0 {
        let half = BigUint::from(10u32).pow(digits as u32 / 2);
        out.push(stone / &half);
        out.push(stone % &half);
    } else {
        out.push(stone * 2024u32);
    }
    out
}

/// Stones counted by engraved value. Order is irrelevant to the count and
/// every stone evolves on its own, so equal stones share one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multiset {
    counts: FxHashMap<BigUint, BigUint>,
}

impl Multiset {
    pub fn from_stones<'a>(stones: impl IntoIterator<Item = &'a BigUint>) -> Self {
        let mut multiset = Multiset::default();
        for stone in stones {multiset.add(stone.clone(), &BigUint::one())};
        multiset
    }

    fn add(&mut self, stone: BigUint, count: &BigUint) {
        if count.is_zero() {return};
        *self.counts.entry(stone).or_default() += count;
    }

    pub fn step(&self) -> Multiset {
        let mut next = Multiset::default();
        for (stone, count) in &self.counts {
            for derived in blink(stone) {next.add(derived, count)};
        }
        next
    }

    pub fn advance(self, rounds: usize) -> Multiset {
        (1 ..= rounds).fold(self, |multiset, round| {
            let next = multiset.step();
            tracing::trace!(round, distinct = next.distinct(), "blinked");
            next
        })
    }

    pub fn total(&self) -> BigUint {
        self.counts.values().sum()
    }

    pub fn distinct(&self) -> usize {self.counts.len()}
}

pub fn simulate(initial: &[BigUint], rounds: usize) -> BigUint {
    let total = Multiset::from_stones(initial).advance(rounds).total();
    tracing::debug!(stones = initial.len(), rounds, %total, "simulated");
    total
}

pub fn solve(part: u8, input: &str) -> Result<String, PuzzleError> {
    let stones = parse_stones(input)?;
    Ok(simulate(&stones, if part == 1 {25} else {75}).to_string())
}
