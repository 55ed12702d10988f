//! Command-line interface definition for wordlist-gen
//!
//! Provides argument parsing and validation for the wordlist generator.

use clap::Parser;
use std::path::PathBuf;

use crate::charset::CharsetKind;
use crate::config::GenOptions;
use crate::duplicates::DuplicateLimits;
use crate::output::{is_start_file, SplitLimit};

/// Wordlists above this size break some cracking tools
const TWO_GIB: u64 = 2 * 1024 * 1024 * 1024;

/// Combinatorial wordlist generator
///
/// Enumerates every string between a minimum and maximum length over the
/// given character sets, optionally shaped by a pattern.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wordlist-gen",
    author = "m0h1nd4",
    version,
    about = "Combinatorial wordlist generator for penetration testing",
    long_about = r#"
╔══════════════════════════════════════════════════════════════╗
║                     WORDLIST-GEN v1.0.0                      ║
║              Combinatorial Wordlist Generation               ║
╚══════════════════════════════════════════════════════════════╝

Generate every string from MIN to MAX characters long. Up to four charsets
may follow the lengths: lowercase, uppercase, numbers and symbols. Use "+"
to keep a slot's default.

EXAMPLES:
    # Every lowercase string of length 1 to 4
    wordlist-gen 1 4

    # Strings over "abc123", written to a file
    wordlist-gen 6 6 abc123 -o wordlist.txt

    # "pass" followed by two digits
    wordlist-gen 6 6 -t pass%%

    # Literal "@" in the first position of a pattern
    wordlist-gen 3 3 -t @@% -l @aa

    # Resume an interrupted run
    wordlist-gen 1 8 -o wordlist.txt -r

    # 1,000,000-line chunks named after their first and last word
    wordlist-gen 4 6 -o START -c 1000000

    # Permute words
    wordlist-gen 1 1 -p dog cat bird

PATTERN CHARACTERS:
    @   lowercase charset
    ,   uppercase charset
    %   numeric charset
    ^   symbol charset
    other characters are emitted as-is
"#,
    after_help = "For more information, visit: https://github.com/m0h1nd4/wordlist-gen"
)]
pub struct Args {
    /// Minimum string length
    #[arg(value_name = "MIN")]
    pub min: usize,

    /// Maximum string length
    #[arg(value_name = "MAX")]
    pub max: usize,

    /// Charsets: lowercase, uppercase, numbers, symbols ("+" keeps the default)
    #[arg(value_name = "CHARSET", num_args = 0..=4)]
    pub charsets: Vec<String>,

    /// Split output into files of at most SIZE (e.g. 10mb, 1gib); requires -o START
    #[arg(short = 'b', value_name = "SIZE")]
    pub bytes: Option<String>,

    /// Split output into files of at most LINES lines; requires -o START
    #[arg(short = 'c', value_name = "LINES")]
    pub lines: Option<u64>,

    /// Limit consecutive duplicates, e.g. "2", "2@", "1@,%"
    #[arg(short = 'd', value_name = "SPEC")]
    pub duplicates: Option<String>,

    /// Stop at this string (length must equal MAX)
    #[arg(short = 'e', value_name = "END")]
    pub end: Option<String>,

    /// Invert the output: the leftmost position changes fastest
    #[arg(short = 'i', default_value_t = false)]
    pub inverted: bool,

    /// Pin pattern characters: a marker repeated at its own position stays literal
    #[arg(short = 'l', value_name = "LITERAL")]
    pub literal: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Permute the characters of one word, or several words
    #[arg(short = 'p', value_name = "WORD", num_args = 1..)]
    pub permute: Option<Vec<String>>,

    /// Permute the words listed in FILE
    #[arg(short = 'q', value_name = "FILE")]
    pub permute_file: Option<PathBuf>,

    /// Resume from the last line of the output file (with -b/-c: the open START chunk; a finished run has nothing to resume)
    #[arg(short = 'r', default_value_t = false)]
    pub resume: bool,

    /// Start at this string (length must equal MIN)
    #[arg(short = 's', value_name = "START")]
    pub start: Option<String>,

    /// Pattern, e.g. "@@god@@@@"
    #[arg(short = 't', value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Suppress the progress bar
    #[arg(short = 'u', default_value_t = false)]
    pub no_progress: bool,

    /// Quiet mode - minimal output
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Write buffer size
    #[arg(long, value_name = "SIZE", default_value = "4mib")]
    pub buffer_size: String,
}

impl Args {
    /// Check option combinations that clap cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        let permuting = self.permute.is_some() || self.permute_file.is_some();

        if self.permute.is_some() && self.permute_file.is_some() {
            anyhow::bail!("-p and -q cannot be used together");
        }
        if permuting && (self.pattern.is_some() || self.start.is_some() || self.end.is_some()) {
            anyhow::bail!("Permutation (-p/-q) cannot be combined with -t, -s or -e");
        }
        if self.literal.is_some() && self.pattern.is_none() {
            anyhow::bail!("You must specify -t when using -l");
        }
        if self.resume {
            if self.output.is_none() {
                anyhow::bail!("Resume (-r) needs the output file given with -o");
            }
            if self.start.is_some() {
                anyhow::bail!("Resume (-r) cannot be combined with -s");
            }
        }
        if self.bytes.is_some() || self.lines.is_some() {
            match self.output {
                Some(ref path) if is_start_file(path) => {}
                _ => anyhow::bail!("Splitting output (-b/-c) requires -o START"),
            }
        }
        if self.lines == Some(0) {
            anyhow::bail!("Line count for -c must be greater than zero");
        }
        Ok(())
    }

    /// Charset slots in order; "+" keeps the default
    pub fn charset_slots(&self) -> [Option<String>; 4] {
        let mut slots: [Option<String>; 4] = Default::default();
        for (slot, arg) in slots.iter_mut().zip(&self.charsets) {
            if arg != "+" {
                *slot = Some(arg.clone());
            }
        }
        slots
    }

    /// Parse the duplicate limit specification
    pub fn parse_duplicates(&self) -> anyhow::Result<DuplicateLimits> {
        match self.duplicates {
            Some(ref spec) => parse_duplicates(spec),
            None => Ok(DuplicateLimits::unlimited()),
        }
    }

    /// Parse the chunk limits given with -b and -c
    pub fn parse_split(&self) -> anyhow::Result<SplitLimit> {
        let max_bytes = self.bytes.as_deref().map(parse_size).transpose()?;
        if max_bytes == Some(0) {
            anyhow::bail!("Size for -b must be greater than zero");
        }
        Ok(SplitLimit {
            max_bytes,
            max_lines: self.lines,
        })
    }

    /// Parse buffer size string to bytes
    pub fn parse_buffer_size(&self) -> anyhow::Result<usize> {
        let size = parse_size(&self.buffer_size)?;
        usize::try_from(size)
            .map_err(|_| anyhow::anyhow!("Buffer size too large: '{}'", self.buffer_size))
    }

    /// Line count above which a chunk may grow past 2 GiB
    pub fn large_chunk_threshold(&self) -> Option<u64> {
        let lines = self.lines?;
        let safe = TWO_GIB / self.max.max(1) as u64;
        (lines > safe).then_some(safe)
    }

    /// Generation options for odometer mode
    pub fn to_gen_options(&self) -> anyhow::Result<GenOptions> {
        Ok(GenOptions {
            min: self.min,
            max: self.max,
            charsets: self.charset_slots(),
            pattern: self.pattern.clone(),
            literal: self.literal.clone(),
            duplicates: self.parse_duplicates()?,
            start: self.start.clone(),
            end: self.end.clone(),
            order: if self.inverted {
                crate::odometer::Order::Inverted
            } else {
                crate::odometer::Order::Forward
            },
        })
    }
}

/// Parse "N" or "N" followed by charset markers
///
/// A bare number limits the lowercase charset.
pub fn parse_duplicates(spec: &str) -> anyhow::Result<DuplicateLimits> {
    let spec = spec.trim();
    let digits = spec.find(|c: char| !c.is_ascii_digit()).unwrap_or(spec.len());
    if digits == 0 {
        anyhow::bail!("-d must be followed by [n][@,%^], got '{}'", spec);
    }

    let limit: usize = spec[..digits]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid duplicate limit: '{}'", spec))?;
    let markers = &spec[digits..];

    let mut limits = DuplicateLimits::unlimited();
    if markers.is_empty() {
        limits.set(CharsetKind::Lower, Some(limit));
    }
    for marker in markers.chars() {
        let kind = CharsetKind::from_marker(marker).ok_or_else(|| {
            anyhow::anyhow!("The type of duplicates must be one of [@,%^], got '{}'", marker)
        })?;
        limits.set(kind, Some(limit));
    }

    Ok(limits)
}

/// Parse human-readable size string to bytes
///
/// `kb`/`mb`/`gb` are powers of 1000, `kib`/`mib`/`gib` powers of 1024.
pub fn parse_size(size_str: &str) -> anyhow::Result<u64> {
    let lower = size_str.trim().to_lowercase();

    let units: [(&str, u64); 7] = [
        ("kib", 1024),
        ("mib", 1024 * 1024),
        ("gib", 1024 * 1024 * 1024),
        ("kb", 1000),
        ("mb", 1000 * 1000),
        ("gb", 1000 * 1000 * 1000),
        ("b", 1),
    ];

    let (num_str, multiplier) = units
        .iter()
        .find_map(|(suffix, m)| lower.strip_suffix(suffix).map(|n| (n, *m)))
        .unwrap_or((lower.as_str(), 1));

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size too large: '{}'", size_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["wordlist-gen"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_positional_charsets() {
        let a = args(&["1", "3", "abc", "+", "123"]);
        assert_eq!(a.min, 1);
        assert_eq!(a.max, 3);
        let slots = a.charset_slots();
        assert_eq!(slots[0].as_deref(), Some("abc"));
        assert_eq!(slots[1], None);
        assert_eq!(slots[2].as_deref(), Some("123"));
        assert_eq!(slots[3], None);
    }

    #[test]
    fn test_to_gen_options() {
        let a = args(&["3", "3", "-t", "@@%", "-l", "@aa", "-i", "-d", "1@"]);
        let opts = a.to_gen_options().unwrap();
        assert_eq!(opts.pattern.as_deref(), Some("@@%"));
        assert_eq!(opts.literal.as_deref(), Some("@aa"));
        assert_eq!(opts.order, crate::odometer::Order::Inverted);
        assert_eq!(opts.duplicates.get(CharsetKind::Lower), Some(1));
    }

    #[test]
    fn test_permute_words() {
        let a = args(&["1", "1", "-p", "dog", "cat", "bird"]);
        assert_eq!(
            a.permute,
            Some(vec!["dog".to_string(), "cat".to_string(), "bird".to_string()])
        );
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_parse_duplicates() {
        let limits = parse_duplicates("2").unwrap();
        assert_eq!(limits.get(CharsetKind::Lower), Some(2));
        assert_eq!(limits.get(CharsetKind::Upper), None);

        let limits = parse_duplicates("1@,%").unwrap();
        assert_eq!(limits.get(CharsetKind::Lower), Some(1));
        assert_eq!(limits.get(CharsetKind::Upper), Some(1));
        assert_eq!(limits.get(CharsetKind::Numeric), Some(1));
        assert_eq!(limits.get(CharsetKind::Symbol), None);

        assert!(parse_duplicates("@").is_err());
        assert!(parse_duplicates("2x").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64mb").unwrap(), 64_000_000);
        assert_eq!(parse_size("64MiB").unwrap(), 64 * 1024 * 1024);
        assert_eq!(parse_size("1gib").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("10kb").unwrap(), 10_000);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_split_requires_start_file() {
        assert!(args(&["1", "2", "-c", "100", "-o", "out.txt"]).validate().is_err());
        assert!(args(&["1", "2", "-c", "100"]).validate().is_err());
        assert!(args(&["1", "2", "-b", "1mb", "-o", "dir/START"]).validate().is_ok());
    }

    #[test]
    fn test_resume_rules() {
        assert!(args(&["1", "2", "-r"]).validate().is_err());
        assert!(args(&["1", "2", "-r", "-o", "o.txt", "-s", "a"]).validate().is_err());
        assert!(args(&["1", "2", "-r", "-o", "o.txt"]).validate().is_ok());
    }

    #[test]
    fn test_permute_conflicts() {
        assert!(args(&["1", "1", "-t", "@", "-p", "ab"]).validate().is_err());
        assert!(args(&["3", "3", "-l", "@@@"]).validate().is_err());
    }

    #[test]
    fn test_large_chunk_warning() {
        let a = args(&["8", "8", "-o", "START", "-c", "1000000000"]);
        assert_eq!(a.large_chunk_threshold(), Some(TWO_GIB / 8));
        let a = args(&["8", "8", "-o", "START", "-c", "1000"]);
        assert_eq!(a.large_chunk_threshold(), None);
    }
}
