//! Deterministic bounded random source.
//!
//! Burst lengths and static priorities are drawn from a fixed table of
//! pre-computed values rather than a live RNG, so a simulation replays
//! identically for the same workload, table, and policy. The cursor wraps
//! around when the table is exhausted, so running out of values is never
//! an error.
//!
//! # Draw Rule
//!
//! `next(bound)` maps the current table entry `v` to `1 + v % bound`, i.e. a
//! value in `[1, bound]`, and advances the cursor by one.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors building a [`RandomTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table has no values; `next` would have nothing to draw from.
    #[error("random table must contain at least one value")]
    Empty,
    /// The leading value count could not be parsed.
    #[error("invalid random table count {0:?}")]
    InvalidCount(String),
    /// A table entry could not be parsed.
    #[error("invalid random table value {0:?}")]
    InvalidValue(String),
    /// The text declared more values than it contains.
    #[error("random table declares {declared} values but only {found} are present")]
    Truncated { declared: usize, found: usize },
}

/// A fixed table of random values with a wrapping cursor.
///
/// Every draw is a function of the table contents and the number of draws
/// made so far, which keeps whole simulation runs reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomTable {
    values: Vec<u64>,
    cursor: usize,
}

impl RandomTable {
    /// Builds a table from raw values. The table must be non-empty.
    pub fn from_values(values: Vec<u64>) -> Result<Self, TableError> {
        if values.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { values, cursor: 0 })
    }

    /// Parses the count-prefixed text format: the first whitespace-separated
    /// token is the number of values, followed by that many values. Tokens
    /// beyond the declared count are ignored.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next().ok_or(TableError::Empty)?;
        let declared: usize = head
            .parse()
            .map_err(|_| TableError::InvalidCount(head.to_string()))?;
        if declared == 0 {
            return Err(TableError::Empty);
        }

        let mut values = Vec::with_capacity(declared);
        for token in tokens.take(declared) {
            let value = token
                .parse()
                .map_err(|_| TableError::InvalidValue(token.to_string()))?;
            values.push(value);
        }
        if values.len() < declared {
            return Err(TableError::Truncated {
                declared,
                found: values.len(),
            });
        }
        Self::from_values(values)
    }

    /// Synthesizes a table of `len` values from a seeded generator.
    ///
    /// The same seed always yields the same table, so generated tables are
    /// as replayable as parsed ones.
    pub fn generate(seed: u64, len: usize) -> Result<Self, TableError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let values = (0..len).map(|_| rng.random::<u32>() as u64).collect();
        Self::from_values(values)
    }

    /// Draws the next value in `[1, bound]` and advances the cursor.
    ///
    /// Workload validation guarantees a positive bound for every burst cap
    /// the simulation draws with.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is 0.
    pub fn next(&mut self, bound: u64) -> u64 {
        assert!(bound >= 1, "draw bound must be positive");
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        1 + value % bound
    }

    /// Number of values in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stays_in_bounds() {
        let mut table = RandomTable::from_values(vec![0, 1, 7, 99, 100]).unwrap();
        for _ in 0..50 {
            let v = table.next(10);
            assert!((1..=10).contains(&v));
        }
    }

    #[test]
    fn test_draw_rule() {
        let mut table = RandomTable::from_values(vec![12]).unwrap();
        // 1 + 12 % 10 = 3
        assert_eq!(table.next(10), 3);
        // 1 + 12 % 5 = 3
        assert_eq!(table.next(5), 3);
        // 1 + 12 % 4 = 1
        assert_eq!(table.next(4), 1);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut table = RandomTable::from_values(vec![1, 2, 3]).unwrap();
        let first_pass: Vec<u64> = (0..3).map(|_| table.next(100)).collect();
        let second_pass: Vec<u64> = (0..3).map(|_| table.next(100)).collect();
        assert_eq!(first_pass, vec![2, 3, 4]);
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_bound_one_always_one() {
        let mut table = RandomTable::from_values(vec![0, 5, 123_456]).unwrap();
        for _ in 0..6 {
            assert_eq!(table.next(1), 1);
        }
    }

    #[test]
    #[should_panic(expected = "draw bound must be positive")]
    fn test_zero_bound_draw_panics() {
        let mut table = RandomTable::from_values(vec![3]).unwrap();
        table.next(0);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(RandomTable::from_values(vec![]), Err(TableError::Empty));
        assert_eq!(RandomTable::parse(""), Err(TableError::Empty));
        assert_eq!(RandomTable::parse("0"), Err(TableError::Empty));
    }

    #[test]
    fn test_parse_count_prefixed() {
        let mut table = RandomTable::parse("3\n10\n20\n30\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.next(1000), 11);
        assert_eq!(table.next(1000), 21);
        assert_eq!(table.next(1000), 31);
    }

    #[test]
    fn test_parse_ignores_extra_values() {
        let table = RandomTable::parse("2 5 6 7 8").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            RandomTable::parse("x 1 2"),
            Err(TableError::InvalidCount("x".to_string()))
        );
        assert_eq!(
            RandomTable::parse("2 1 oops"),
            Err(TableError::InvalidValue("oops".to_string()))
        );
        assert_eq!(
            RandomTable::parse("4 1 2"),
            Err(TableError::Truncated {
                declared: 4,
                found: 2
            })
        );
    }

    #[test]
    fn test_generate_deterministic_per_seed() {
        let a = RandomTable::generate(42, 64).unwrap();
        let b = RandomTable::generate(42, 64).unwrap();
        let c = RandomTable::generate(43, 64).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_generate_empty_rejected() {
        assert_eq!(RandomTable::generate(1, 0), Err(TableError::Empty));
    }
}
