//! Output management module
//!
//! Writes generated candidates to stdout, to a single file, or to a series of
//! size/line-capped chunk files. Chunks are written to a file named `START`
//! and renamed to `<first>-<last>.txt` once full.

use memmap2::Mmap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::encoding::decode_line;

/// Default buffer size for file writing (4MB)
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// File name that enables chunked output
pub const START_FILE_NAME: &str = "START";

/// Buffered line writer with counters
pub struct OutputWriter<W: Write> {
    writer: BufWriter<W>,
    lines_written: u64,
    bytes_written: u64,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(inner: W, buffer_size: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(buffer_size, inner),
            lines_written: 0,
            bytes_written: 0,
        }
    }

    /// Write a line to the output
    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1;
        Ok(())
    }

    /// Flush the buffer
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl OutputWriter<File> {
    /// Create (truncating) or append to a file
    pub fn create(path: &Path, buffer_size: usize, append: bool) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|e| anyhow::anyhow!("Cannot open output file {:?}: {}", path, e))?;

        Ok(Self::new(file, buffer_size))
    }
}

impl<W: Write> Drop for OutputWriter<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// When to close the current chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitLimit {
    pub max_bytes: Option<u64>,
    pub max_lines: Option<u64>,
}

impl SplitLimit {
    pub fn is_set(&self) -> bool {
        self.max_bytes.is_some() || self.max_lines.is_some()
    }

    /// Whether adding a line of `line_bytes` to a chunk of `lines`/`bytes` overflows it
    fn overflows(&self, lines: u64, bytes: u64, line_bytes: u64) -> bool {
        if lines == 0 {
            return false;
        }
        self.max_lines.map_or(false, |max| lines + 1 > max)
            || self.max_bytes.map_or(false, |max| bytes + line_bytes > max)
    }
}

/// State of a partially written chunk picked up on resume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChunk {
    pub first: String,
    pub last: String,
    pub lines: u64,
    pub bytes: u64,
}

/// Chunked output that rotates `START` into `<first>-<last>.txt` files
pub struct ChunkedOutput {
    start_path: PathBuf,
    dir: PathBuf,
    limit: SplitLimit,
    buffer_size: usize,
    writer: Option<OutputWriter<File>>,
    first: Option<String>,
    last: Option<String>,
    chunk_lines: u64,
    chunk_bytes: u64,
    lines_written: u64,
    bytes_written: u64,
    files: Vec<PathBuf>,
}

impl ChunkedOutput {
    pub fn new(
        start_path: PathBuf,
        limit: SplitLimit,
        buffer_size: usize,
        resumed: Option<OpenChunk>,
    ) -> anyhow::Result<Self> {
        let dir = start_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut out = Self {
            start_path,
            dir,
            limit,
            buffer_size,
            writer: None,
            first: None,
            last: None,
            chunk_lines: 0,
            chunk_bytes: 0,
            lines_written: 0,
            bytes_written: 0,
            files: Vec::new(),
        };

        match resumed {
            Some(chunk) if chunk.lines > 0 => {
                out.writer = Some(OutputWriter::create(&out.start_path, buffer_size, true)?);
                out.first = Some(chunk.first);
                out.last = Some(chunk.last);
                out.chunk_lines = chunk.lines;
                out.chunk_bytes = chunk.bytes;
            }
            _ => {
                out.writer = Some(OutputWriter::create(&out.start_path, buffer_size, false)?);
            }
        }

        Ok(out)
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        let line_bytes = line.len() as u64 + 1;
        if self
            .limit
            .overflows(self.chunk_lines, self.chunk_bytes, line_bytes)
        {
            self.rotate()?;
        }

        if self.writer.is_none() {
            self.writer = Some(OutputWriter::create(&self.start_path, self.buffer_size, false)?);
        }
        if let Some(ref mut writer) = self.writer {
            writer.write_line(line)?;
        }

        if self.first.is_none() {
            self.first = Some(line.to_string());
        }
        self.last = Some(line.to_string());
        self.chunk_lines += 1;
        self.chunk_bytes += line_bytes;
        self.lines_written += 1;
        self.bytes_written += line_bytes;
        Ok(())
    }

    /// Close the current chunk and rename it after its first and last line
    fn rotate(&mut self) -> anyhow::Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush()?;
        drop(writer);

        let first = self.first.take().unwrap_or_default();
        let last = self.last.take().unwrap_or_default();
        let target = self.dir.join(chunk_file_name(&first, &last));
        fs::rename(&self.start_path, &target)
            .map_err(|e| anyhow::anyhow!("Cannot rename {:?} to {:?}: {}", self.start_path, target, e))?;
        log::debug!("closed chunk {:?} ({} lines)", target, self.chunk_lines);

        self.files.push(target);
        self.chunk_lines = 0;
        self.chunk_bytes = 0;
        Ok(())
    }

    /// Flush and rename the last chunk; an empty trailing chunk is removed
    pub fn finish(&mut self) -> anyhow::Result<()> {
        if self.chunk_lines > 0 {
            self.rotate()
        } else {
            self.writer = None;
            if self.start_path.exists() {
                fs::remove_file(&self.start_path)?;
            }
            Ok(())
        }
    }

    /// Flush without closing the chunk, leaving `START` resumable
    pub fn flush(&mut self) -> anyhow::Result<()> {
        match self.writer {
            Some(ref mut w) => w.flush(),
            None => Ok(()),
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Output mode for the generator
pub enum OutputMode {
    /// Standard output
    Stdout(OutputWriter<Stdout>),
    /// One file for all output
    Single {
        writer: OutputWriter<File>,
        path: PathBuf,
    },
    /// Capped chunk files
    Chunked(ChunkedOutput),
}

impl OutputMode {
    pub fn stdout(buffer_size: usize) -> Self {
        Self::Stdout(OutputWriter::new(io::stdout(), buffer_size))
    }

    pub fn single(path: PathBuf, buffer_size: usize, append: bool) -> anyhow::Result<Self> {
        let writer = OutputWriter::create(&path, buffer_size, append)?;
        Ok(Self::Single { writer, path })
    }

    pub fn chunked(
        start_path: PathBuf,
        limit: SplitLimit,
        buffer_size: usize,
        resumed: Option<OpenChunk>,
    ) -> anyhow::Result<Self> {
        Ok(Self::Chunked(ChunkedOutput::new(
            start_path,
            limit,
            buffer_size,
            resumed,
        )?))
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        match self {
            Self::Stdout(w) => w.write_line(line),
            Self::Single { writer, .. } => writer.write_line(line),
            Self::Chunked(c) => c.write_line(line),
        }
    }

    /// Flush and close the output
    ///
    /// `complete` is false when generation stopped early; chunked output then
    /// keeps its `START` file so the run can be resumed.
    pub fn finish(&mut self, complete: bool) -> anyhow::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::Single { writer, .. } => writer.flush(),
            Self::Chunked(c) if complete => c.finish(),
            Self::Chunked(c) => c.flush(),
        }
    }

    /// Files produced so far
    pub fn files(&self) -> Vec<PathBuf> {
        match self {
            Self::Stdout(_) => Vec::new(),
            Self::Single { path, .. } => vec![path.clone()],
            Self::Chunked(c) => c.files().to_vec(),
        }
    }
}

/// Name of a closed chunk file
pub fn chunk_file_name(first: &str, last: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect()
    };
    format!("{}-{}.txt", clean(first), clean(last))
}

/// Ensure output directory exists
pub fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("Cannot create output directory {:?}: {}", dir, e))?;
    }
    Ok(())
}

/// Whether `path` names the chunked-output `START` file
pub fn is_start_file(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(START_FILE_NAME)
}

/// What a previous run left in an output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTail {
    pub first_line: Option<String>,
    pub last_line: Option<String>,
    /// Complete (newline-terminated) lines
    pub lines: u64,
    /// Bytes up to and including the last newline
    pub complete_bytes: u64,
    /// Whether the file ends in a partially written line
    pub partial: bool,
}

impl OutputTail {
    /// Chunk state for resuming chunked output
    pub fn open_chunk(&self) -> Option<OpenChunk> {
        match (&self.first_line, &self.last_line) {
            (Some(first), Some(last)) => Some(OpenChunk {
                first: first.clone(),
                last: last.clone(),
                lines: self.lines,
                bytes: self.complete_bytes,
            }),
            _ => None,
        }
    }
}

/// Scan a previous output file for its first and last complete line
pub fn scan_output(path: &Path) -> anyhow::Result<OutputTail> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Cannot open {:?} to resume: {}", path, e))?;
    if file.metadata()?.len() == 0 {
        return Ok(OutputTail::default());
    }

    let mmap = unsafe { Mmap::map(&file)? };
    let data = &mmap[..];

    let complete = memchr::memrchr(b'\n', data).map_or(0, |i| i + 1);
    let body = &data[..complete];

    let mut tail = OutputTail {
        lines: memchr::memchr_iter(b'\n', body).count() as u64,
        complete_bytes: complete as u64,
        partial: complete < data.len(),
        ..OutputTail::default()
    };

    if complete > 0 {
        let first_end = memchr::memchr(b'\n', body).unwrap_or(0);
        tail.first_line = Some(decode_line(&body[..first_end]));

        let without_newline = &body[..complete - 1];
        let last_start = memchr::memrchr(b'\n', without_newline).map_or(0, |i| i + 1);
        tail.last_line = Some(decode_line(&without_newline[last_start..]));
    }

    Ok(tail)
}

/// Cut a partially written trailing line so appended output starts on a line boundary
pub fn truncate_partial(path: &Path, tail: &OutputTail) -> anyhow::Result<()> {
    if tail.partial {
        log::warn!(
            "Dropping partially written line at the end of {:?}",
            path
        );
        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(tail.complete_bytes)?;
    }
    Ok(())
}
