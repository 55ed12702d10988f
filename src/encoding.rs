//! Encoding detection and decoding
//!
//! Word files for permutation mode may come in any encoding; they are
//! detected and transcoded to UTF-8 before being split into lines. Lines
//! read back from our own output are UTF-8 and decoded lossily.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Confidence level (0.0 - 1.0)
    pub confidence: f32,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            confidence: 1.0,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> anyhow::Result<EncodingInfo> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    // First 64KB is plenty for a word list
    let mut sample = vec![0u8; 64 * 1024];
    let bytes_read = reader.read(&mut sample)?;
    sample.truncate(bytes_read);

    if bytes_read == 0 {
        return Ok(EncodingInfo::default());
    }

    if let Some(encoding) = detect_bom(&sample) {
        return Ok(EncodingInfo {
            name: encoding.name(),
            confidence: 1.0,
            encoding,
        });
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, true);
    let encoding = detector.guess(None, true);

    let confidence = if encoding == encoding_rs::UTF_8 {
        if std::str::from_utf8(&sample).is_ok() {
            1.0
        } else {
            0.5
        }
    } else {
        0.8
    };

    Ok(EncodingInfo {
        name: encoding.name(),
        confidence,
        encoding,
    })
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<&'static Encoding> {
    if content.len() >= 3 && content[0..3] == [0xEF, 0xBB, 0xBF] {
        return Some(encoding_rs::UTF_8);
    }
    if content.len() >= 2 {
        if content[0..2] == [0xFE, 0xFF] {
            return Some(encoding_rs::UTF_16BE);
        }
        if content[0..2] == [0xFF, 0xFE] {
            return Some(encoding_rs::UTF_16LE);
        }
    }
    None
}

/// Decode one line of UTF-8 output, replacing invalid sequences
pub fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            log::warn!("Invalid UTF-8 in output line, using lossy conversion");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// A line iterator that handles different encodings
///
/// The file is transcoded to UTF-8 as a stream, so multi-byte newlines
/// (UTF-16) are split correctly.
pub struct EncodedLineIterator {
    reader: BufReader<DecodeReaderBytes<File, Vec<u8>>>,
    encoding: &'static Encoding,
    line_buffer: Vec<u8>,
    first: bool,
}

impl EncodedLineIterator {
    /// Create a new line iterator for a file with automatic encoding detection
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let encoding_info = detect_encoding(path)?;
        Self::with_encoding(path, encoding_info.encoding)
    }

    /// Create with a specific encoding
    pub fn with_encoding(path: &Path, encoding: &'static Encoding) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .build(file);

        Ok(Self {
            reader: BufReader::with_capacity(64 * 1024, decoder),
            encoding,
            line_buffer: Vec::with_capacity(4096),
            first: true,
        })
    }

    /// Get the detected encoding
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Iterator for EncodedLineIterator {
    type Item = anyhow::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(_) => {
                while self.line_buffer.last() == Some(&b'\n')
                    || self.line_buffer.last() == Some(&b'\r')
                {
                    self.line_buffer.pop();
                }

                let mut bytes = &self.line_buffer[..];
                if std::mem::take(&mut self.first) && bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
                    bytes = &bytes[3..];
                }

                // already UTF-8; anything undecodable became U+FFFD
                Some(Ok(decode_line(bytes)))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Read the non-empty lines of a word file for permutation
pub fn read_word_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let iter = EncodedLineIterator::new(path)
        .map_err(|e| anyhow::anyhow!("Cannot open word file {:?}: {}", path, e))?;
    log::debug!("reading {:?} as {}", path, iter.encoding().name());

    let mut words = Vec::new();
    for line in iter {
        let line = line?;
        if !line.is_empty() {
            words.push(line);
        }
    }

    if words.is_empty() {
        anyhow::bail!("Word file {:?} contains no words", path);
    }

    Ok(words)
}
