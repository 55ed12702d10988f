//! Permutation mode
//!
//! Emits every ordering of a set of elements (single characters or whole
//! words), concatenated. Elements are sorted up front so the orderings come
//! out in lexicographic order; repeated elements produce each distinct
//! arrangement once.

use crate::error::{GenError, Result};

/// Lexicographic permutations of a list of elements
#[derive(Debug, Clone)]
pub struct Permutations {
    elements: Vec<String>,
    done: bool,
}

impl Permutations {
    pub fn new(mut elements: Vec<String>) -> Result<Self> {
        if elements.is_empty() {
            return Err(GenError::config("permutation needs at least one element"));
        }
        elements.sort();
        Ok(Self {
            elements,
            done: false,
        })
    }

    /// Permute the characters of a single word
    pub fn from_word(word: &str) -> Result<Self> {
        Self::new(word.chars().map(String::from).collect())
    }

    /// Permute the given words; a single word has its characters permuted instead
    pub fn from_words(mut words: Vec<String>) -> Result<Self> {
        if words.len() == 1 {
            let word = words.remove(0);
            return Self::from_word(&word);
        }
        Self::new(words)
    }

    /// Sorted elements being permuted
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Number of distinct permutations, saturating at `u128::MAX`
    pub fn total(&self) -> u128 {
        // n! / (k1! k2! ...), built as a product of binomials so every step stays integral
        let mut total: u128 = 1;
        let mut placed: u128 = 0;

        let mut run: u128 = 0;

        for (i, element) in self.elements.iter().enumerate() {
            run = if i > 0 && self.elements[i - 1] == *element {
                run + 1
            } else {
                1
            };
            placed += 1;
            total = match total.checked_mul(placed) {
                Some(v) => v / run,
                None => return u128::MAX,
            };
        }

        total
    }

    /// Bytes of one emitted line, newline included
    pub fn line_bytes(&self) -> u128 {
        self.elements.iter().map(|e| e.len() as u128).sum::<u128>() + 1
    }
}

impl Iterator for Permutations {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let current = self.elements.concat();
        if !next_permutation(&mut self.elements) {
            self.done = true;
        }
        Some(current)
    }
}

/// Rearrange `v` into the next lexicographically greater ordering
///
/// Returns `false` (leaving `v` untouched) when `v` is already the last one.
pub fn next_permutation<T: Ord>(v: &mut [T]) -> bool {
    if v.len() < 2 {
        return false;
    }

    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}
