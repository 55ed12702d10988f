//! Charset registry
//!
//! Holds the four named character sets (lower, upper, numeric, symbol) every
//! generated position draws from. Each set is deduplicated on construction,
//! first occurrence wins.

use ahash::RandomState;
use hashbrown::HashMap;
use std::fmt;

use crate::error::{GenError, Result};

pub const DEFAULT_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DEFAULT_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DEFAULT_NUMERIC: &str = "0123456789";
pub const DEFAULT_SYMBOL: &str = "!@#$%^&*()-_+=~`[]{}|\\:;\"'<>,.?/ ";

/// The four charset slots, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharsetKind {
    Lower,
    Upper,
    Numeric,
    Symbol,
}

impl CharsetKind {
    /// All kinds in the order literals are looked up
    pub const ALL: [CharsetKind; 4] = [
        CharsetKind::Lower,
        CharsetKind::Upper,
        CharsetKind::Numeric,
        CharsetKind::Symbol,
    ];

    /// Slot index into per-charset arrays such as duplicate limits
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Lower => 0,
            Self::Upper => 1,
            Self::Numeric => 2,
            Self::Symbol => 3,
        }
    }

    /// Pattern wildcard marker for this charset
    #[inline]
    pub fn marker(self) -> char {
        match self {
            Self::Lower => '@',
            Self::Upper => ',',
            Self::Numeric => '%',
            Self::Symbol => '^',
        }
    }

    /// Resolve a pattern character to the charset it stands for, if it is a wildcard
    #[inline]
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '@' => Some(Self::Lower),
            ',' => Some(Self::Upper),
            '%' => Some(Self::Numeric),
            '^' => Some(Self::Symbol),
            _ => None,
        }
    }

    /// Built-in characters for this slot
    pub fn default_chars(self) -> &'static str {
        match self {
            Self::Lower => DEFAULT_LOWER,
            Self::Upper => DEFAULT_UPPER,
            Self::Numeric => DEFAULT_NUMERIC,
            Self::Symbol => DEFAULT_SYMBOL,
        }
    }
}

impl fmt::Display for CharsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Numeric => "numeric",
            Self::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

/// An ordered set of unique characters
#[derive(Debug, Clone)]
pub struct Charset {
    chars: Vec<char>,
    index: HashMap<char, usize, RandomState>,
}

impl Charset {
    /// Build a charset from raw code points, dropping repeats
    pub fn build<I>(kind: CharsetKind, raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = char>,
    {
        let mut chars = Vec::new();
        let mut index = HashMap::with_hasher(RandomState::new());

        for c in raw {
            if !index.contains_key(&c) {
                index.insert(c, chars.len());
                chars.push(c);
            }
        }

        if chars.is_empty() {
            return Err(GenError::InvalidCharset {
                kind,
                reason: "charset must contain at least one character".to_string(),
            });
        }

        Ok(Self { chars, index })
    }

    /// The built-in charset for a slot
    pub fn default_for(kind: CharsetKind) -> Self {
        let chars: Vec<char> = kind.default_chars().chars().collect();
        let index = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect::<HashMap<_, _, RandomState>>();
        Self { chars, index }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`; callers keep indices below `len()`
    #[inline]
    pub fn char_at(&self, index: usize) -> char {
        self.chars[index]
    }

    #[inline]
    pub fn first(&self) -> char {
        self.chars[0]
    }

    #[inline]
    pub fn last(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    /// Position of `c` inside this charset
    #[inline]
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Widest UTF-8 encoding among the members
    pub fn max_utf8_len(&self) -> usize {
        self.chars.iter().map(|c| c.len_utf8()).max().unwrap_or(1)
    }

    pub fn is_ascii(&self) -> bool {
        self.chars.iter().all(|c| c.is_ascii())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// The four charsets of a run plus a lookup table for literal resolution
#[derive(Debug, Clone)]
pub struct Charsets {
    sets: [Charset; 4],
    /// First charset (in lookup order) containing each character, and the index within it
    lookup: HashMap<char, (CharsetKind, usize), RandomState>,
}

impl Charsets {
    pub fn new(lower: Charset, upper: Charset, numeric: Charset, symbol: Charset) -> Self {
        let sets = [lower, upper, numeric, symbol];
        let mut lookup = HashMap::with_hasher(RandomState::new());

        for kind in CharsetKind::ALL {
            for (i, &c) in sets[kind.index()].chars().iter().enumerate() {
                lookup.entry(c).or_insert((kind, i));
            }
        }

        Self { sets, lookup }
    }

    /// Build from optional raw text per slot; `None` keeps the default set
    pub fn from_raw(raw: [Option<&str>; 4]) -> Result<Self> {
        let mut built = Vec::with_capacity(4);
        for kind in CharsetKind::ALL {
            let set = match raw[kind.index()] {
                Some(text) => Charset::build(kind, text.chars())?,
                None => Charset::default_for(kind),
            };
            built.push(set);
        }

        let mut it = built.into_iter();
        match (it.next(), it.next(), it.next(), it.next()) {
            (Some(lower), Some(upper), Some(numeric), Some(symbol)) => {
                Ok(Self::new(lower, upper, numeric, symbol))
            }
            _ => Err(GenError::config("expected exactly four charsets")),
        }
    }

    #[inline]
    pub fn get(&self, kind: CharsetKind) -> &Charset {
        &self.sets[kind.index()]
    }

    #[inline]
    pub fn lower(&self) -> &Charset {
        &self.sets[0]
    }

    /// Resolve a literal to the first charset that holds it
    #[inline]
    pub fn locate(&self, c: char) -> Option<(CharsetKind, usize)> {
        self.lookup.get(&c).copied()
    }

    pub fn is_ascii(&self) -> bool {
        self.sets.iter().all(Charset::is_ascii)
    }
}

impl Default for Charsets {
    fn default() -> Self {
        Self::new(
            Charset::default_for(CharsetKind::Lower),
            Charset::default_for(CharsetKind::Upper),
            Charset::default_for(CharsetKind::Numeric),
            Charset::default_for(CharsetKind::Symbol),
        )
    }
}
