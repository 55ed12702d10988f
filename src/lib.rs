//! # Wordlist Gen
//!
//! Combinatorial wordlist generator for penetration testing.
//!
//! ## Features
//!
//! - **Length ranges**: Every string from a minimum to a maximum length
//! - **Charsets**: Lowercase, uppercase, numeric and symbol sets, each replaceable
//! - **Patterns**: Shape output with `@` `,` `%` `^` placeholders and literals
//! - **Start/end strings**: Generate any contiguous slice of the sequence
//! - **Duplicate limits**: Skip candidates with long runs of the same character
//! - **Resume**: Continue an interrupted run from its output file
//! - **Chunked output**: Split into size or line capped files
//! - **Permutations**: Every ordering of a word's characters or a list of words
//!
//! ## Usage
//!
//! ```bash
//! # Every lowercase string of length 1 to 4
//! wordlist-gen 1 4
//!
//! # "pass" followed by two digits
//! wordlist-gen 6 6 -t pass%%
//!
//! # Resume an interrupted run
//! wordlist-gen 1 8 -o wordlist.txt -r
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wordlist_gen::{enumerate, CharsetKind, GenOptions, RunConfig};
//!
//! let options = GenOptions::new(2, 2)
//!     .charset(CharsetKind::Lower, "ab")
//!     .start("ab");
//! let config = RunConfig::configure(&options).unwrap();
//!
//! let words: Vec<String> = enumerate(&config, None).unwrap().collect();
//! assert_eq!(words, vec!["ab", "ba", "bb"]);
//! ```

pub mod boundary;
pub mod charset;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod encoding;
pub mod error;
pub mod estimate;
pub mod odometer;
pub mod output;
pub mod pattern;
pub mod permute;
pub mod processor;
pub mod progress;
pub mod resume;

pub use charset::{CharsetKind, Charsets};
pub use cli::Args;
pub use config::{GenOptions, RunConfig, MAX_LENGTH};
pub use duplicates::DuplicateLimits;
pub use error::{GenError, Result};
pub use estimate::SpaceEstimate;
pub use odometer::{enumerate, Enumerator, Order};
pub use permute::Permutations;
pub use processor::{Generator, GeneratorConfig, RunSummary, StopHandle};
pub use resume::ResumeState;
