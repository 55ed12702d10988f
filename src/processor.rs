//! Core generation engine
//!
//! Drives a candidate source (odometer or permutation) on the calling thread
//! and hands line batches to a writer thread over a bounded channel, so the
//! enumerator blocks whenever the sink falls behind.

use crate::cli::Args;
use crate::config::{GenOptions, RunConfig};
use crate::encoding::read_word_list;
use crate::error::GenError;
use crate::estimate::{estimate, estimate_permutations, SpaceEstimate};
use crate::odometer::{enumerate, Enumerator};
use crate::output::{
    ensure_output_dir, scan_output, truncate_partial, OutputMode, OutputTail, SplitLimit,
    DEFAULT_BUFFER_SIZE,
};
use crate::permute::Permutations;
use crate::progress::{
    create_progress_bar, format_bytes, format_number, print_bullet, print_header, print_info,
    print_success, GenerationStats,
};

use colored::*;
use crossbeam_channel::bounded;
use indicatif::ProgressBar;
use std::mem;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Lines per batch sent to the writer
const BATCH_SIZE: usize = 4096;

/// Batches that may wait in the channel
const CHANNEL_CAPACITY: usize = 16;

/// What to generate
#[derive(Debug, Clone)]
pub enum GenerationMode {
    /// Every string of the configured lengths
    Odometer(GenOptions),
    /// Every ordering of the given words (or of one word's characters)
    Permute(Vec<String>),
}

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub mode: GenerationMode,
    pub output: Option<PathBuf>,
    pub split: SplitLimit,
    pub resume: bool,
    pub buffer_size: usize,
    pub quiet: bool,
    pub verbose: bool,
    pub progress: bool,
}

impl GeneratorConfig {
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            output: None,
            split: SplitLimit::default(),
            resume: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            quiet: true,
            verbose: false,
            progress: false,
        }
    }

    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let mode = if let Some(ref words) = args.permute {
            GenerationMode::Permute(words.clone())
        } else if let Some(ref path) = args.permute_file {
            GenerationMode::Permute(read_word_list(path)?)
        } else {
            GenerationMode::Odometer(args.to_gen_options()?)
        };

        Ok(Self {
            mode,
            output: args.output.clone(),
            split: args.parse_split()?,
            resume: args.resume,
            buffer_size: args.parse_buffer_size()?,
            quiet: args.quiet,
            verbose: args.verbose,
            progress: !args.no_progress && !args.quiet,
        })
    }
}

/// Cancels a running generation from another thread
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub lines: u64,
    pub bytes: u64,
    /// Candidates dropped by the duplicate filter
    pub skipped: u64,
    pub files: Vec<PathBuf>,
    /// True if the run was cancelled before the source was exhausted
    pub stopped: bool,
    pub last_line: Option<String>,
    pub estimate: SpaceEstimate,
}

/// Candidate producer for one run
enum Source<'a> {
    Odometer(Enumerator<'a>),
    Permute(Permutations),
}

impl Source<'_> {
    fn skipped(&self) -> u64 {
        match self {
            Source::Odometer(e) => e.skipped(),
            Source::Permute(_) => 0,
        }
    }
}

impl Iterator for Source<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            Source::Odometer(e) => e.next(),
            Source::Permute(p) => p.next(),
        }
    }
}

/// Main generator
pub struct Generator {
    config: GeneratorConfig,
    stats: Arc<GenerationStats>,
    stop: StopHandle,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            stats: Arc::new(GenerationStats::new()),
            stop: StopHandle::default(),
        }
    }

    /// Handle that stops the run between two candidates
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Get generation statistics
    pub fn stats(&self) -> Arc<GenerationStats> {
        Arc::clone(&self.stats)
    }

    /// Generate every candidate into the configured sink
    pub fn run(&self) -> anyhow::Result<RunSummary> {
        match self.config.mode {
            GenerationMode::Odometer(ref options) => {
                let run_config = RunConfig::configure(options)?;
                if self.chunks_complete() {
                    return Ok(RunSummary {
                        estimate: estimate(&run_config),
                        ..RunSummary::default()
                    });
                }
                let tail = self.prepare_resume()?;
                let last = tail.as_ref().and_then(|t| t.last_line.as_deref());
                let source = enumerate(&run_config, last)?;
                let estimate = estimate(&run_config);
                self.drive(Source::Odometer(source), estimate, tail.as_ref())
            }
            GenerationMode::Permute(ref words) => {
                if self.config.resume {
                    return Err(GenError::unsupported(
                        "resume",
                        "permutation output cannot be resumed",
                    )
                    .into());
                }
                let perms = Permutations::from_words(words.clone())?;
                let estimate = estimate_permutations(&perms);
                self.drive(Source::Permute(perms), estimate, None)
            }
        }
    }

    /// A chunked run that completed renamed its last chunk, so no `START` is left
    fn chunks_complete(&self) -> bool {
        let done = self.config.resume
            && self.config.split.is_set()
            && self.config.output.as_ref().map_or(false, |path| !path.exists());
        if done {
            log::info!("no open chunk to resume, the run already completed");
            if !self.config.quiet {
                print_info("Nothing left to resume: every chunk has been written");
            }
        }
        done
    }

    /// Read the previous output and cut any half-written last line
    fn prepare_resume(&self) -> anyhow::Result<Option<OutputTail>> {
        if !self.config.resume {
            return Ok(None);
        }
        let path = self
            .config
            .output
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Resume needs an output file"))?;

        let tail = scan_output(path)?;
        truncate_partial(path, &tail)?;

        match tail.last_line {
            Some(ref line) => log::info!("resuming {:?} after {:?}", path, line),
            None => log::info!("{:?} is empty, starting from the beginning", path),
        }
        Ok(Some(tail))
    }

    fn open_output(&self, tail: Option<&OutputTail>) -> anyhow::Result<OutputMode> {
        let buffer_size = self.config.buffer_size;
        let Some(ref path) = self.config.output else {
            return Ok(OutputMode::stdout(buffer_size));
        };

        if let Some(parent) = path.parent() {
            ensure_output_dir(parent)?;
        }

        if self.config.split.is_set() {
            OutputMode::chunked(
                path.clone(),
                self.config.split,
                buffer_size,
                tail.and_then(OutputTail::open_chunk),
            )
        } else {
            OutputMode::single(path.clone(), buffer_size, tail.is_some())
        }
    }

    fn create_progress(&self, estimate: &SpaceEstimate, tail: Option<&OutputTail>) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }
        let Some(total) = estimate.lines_u64() else {
            return ProgressBar::hidden();
        };

        let pb = create_progress_bar(total, "Generating...");
        if let Some(t) = tail {
            if !self.config.split.is_set() {
                pb.set_position(t.lines.min(total));
            }
        }
        pb
    }

    fn drive(
        &self,
        mut source: Source<'_>,
        estimate: SpaceEstimate,
        tail: Option<&OutputTail>,
    ) -> anyhow::Result<RunSummary> {
        if !self.config.quiet {
            print_header("Generating wordlist...");
            print_info(&format!(
                "Estimated output: {} lines, {}",
                format_number(estimate.lines),
                format_bytes(estimate.bytes)
            ));
            if let Some(ref path) = self.config.output {
                print_info(&format!("Output: {:?}", path));
            }
        }

        let mut output = self.open_output(tail)?;
        let pb = self.create_progress(&estimate, tail);

        let (tx, rx) = bounded::<Vec<String>>(CHANNEL_CAPACITY);
        let stats = Arc::clone(&self.stats);
        let writer_pb = pb.clone();

        let writer = thread::spawn(move || -> anyhow::Result<(OutputMode, Option<String>)> {
            let mut last_line = None;
            for mut batch in rx {
                let mut bytes = 0u64;
                for line in &batch {
                    output.write_line(line)?;
                    bytes += line.len() as u64 + 1;
                }
                stats.add_lines(batch.len() as u64, bytes);
                writer_pb.inc(batch.len() as u64);
                last_line = batch.pop().or(last_line);
            }
            Ok((output, last_line))
        });

        let mut stopped = false;
        let mut batch = Vec::with_capacity(BATCH_SIZE);
        loop {
            if self.stop.is_stopped() {
                stopped = true;
                log::info!("generation stopped");
                break;
            }
            let Some(line) = source.next() else {
                break;
            };
            batch.push(line);
            if batch.len() == BATCH_SIZE
                && tx
                    .send(mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE)))
                    .is_err()
            {
                // writer gave up; its error surfaces on join
                break;
            }
        }
        if !batch.is_empty() {
            // a send error means the writer failed; join reports it
            let _ = tx.send(batch);
        }
        drop(tx);

        let (mut output, last_line) = writer
            .join()
            .map_err(|_| anyhow::anyhow!("Writer thread panicked"))??;
        output.finish(!stopped)?;

        self.stats.set_skipped(source.skipped());
        let files = output.files();
        self.stats.set_files(files.len() as u64);

        if stopped {
            pb.abandon_with_message("Stopped".yellow().to_string());
        } else {
            pb.finish_with_message("Complete".green().to_string());
        }

        if !self.config.quiet {
            if let Some(ref path) = self.config.output {
                print_success(&format!("Output written to: {:?}", path));
            }
            if self.config.split.is_set() {
                for file in &files {
                    print_bullet(&format!("{:?}", file));
                }
            }
        }

        Ok(RunSummary {
            lines: self.stats.get_generated_lines(),
            bytes: self.stats.get_written_bytes(),
            skipped: self.stats.get_skipped_lines(),
            files,
            stopped,
            last_line,
            estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharsetKind;
    use crate::output::START_FILE_NAME;
    use std::fs;
    use tempfile::TempDir;

    fn odometer(opts: GenOptions, output: PathBuf) -> GeneratorConfig {
        let mut config = GeneratorConfig::new(GenerationMode::Odometer(opts));
        config.output = Some(output);
        config
    }

    #[test]
    fn test_generate_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        let opts = GenOptions::new(1, 2).charset(CharsetKind::Lower, "ab");

        let summary = Generator::new(odometer(opts, path.clone())).run().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\naa\nab\nba\nbb\n");
        assert_eq!(summary.lines, 6);
        assert_eq!(summary.bytes, 16);
        assert_eq!(summary.estimate.lines, 6);
        assert_eq!(summary.last_line.as_deref(), Some("bb"));
        assert!(!summary.stopped);
    }

    #[test]
    fn test_large_run_spans_batches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        let opts = GenOptions::new(3, 3);

        let summary = Generator::new(odometer(opts, path.clone())).run().unwrap();

        assert_eq!(summary.lines, 26 * 26 * 26);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("aaa\naab\n"));
        assert!(content.ends_with("zzy\nzzz\n"));
    }

    #[test]
    fn test_resume_appends_remaining_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        fs::write(&path, "a\nb\naa\na").unwrap();

        let opts = GenOptions::new(1, 2).charset(CharsetKind::Lower, "ab");
        let mut config = odometer(opts, path.clone());
        config.resume = true;

        let summary = Generator::new(config).run().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\naa\nab\nba\nbb\n");
        assert_eq!(summary.lines, 3);
    }

    #[test]
    fn test_resume_foreign_output_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        fs::write(&path, "a\nZZ\n").unwrap();

        let opts = GenOptions::new(1, 2).charset(CharsetKind::Lower, "ab");
        let mut config = odometer(opts, path);
        config.resume = true;

        let err = Generator::new(config).run().unwrap_err();
        let gen_err = err.downcast_ref::<GenError>().unwrap();
        assert!(gen_err.is_resume_failure());
    }

    #[test]
    fn test_chunked_output() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join(START_FILE_NAME);
        let opts = GenOptions::new(2, 2).charset(CharsetKind::Lower, "ab");

        let mut config = odometer(opts, start.clone());
        config.split = SplitLimit {
            max_bytes: None,
            max_lines: Some(3),
        };

        let summary = Generator::new(config).run().unwrap();

        assert_eq!(summary.files.len(), 2);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("aa-ba.txt")).unwrap(),
            "aa\nab\nba\n"
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("bb-bb.txt")).unwrap(),
            "bb\n"
        );
        assert!(!start.exists());
    }

    #[test]
    fn test_resume_after_completed_chunked_run() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join(START_FILE_NAME);
        let opts = GenOptions::new(2, 2).charset(CharsetKind::Lower, "ab");

        let mut config = odometer(opts, start.clone());
        config.split = SplitLimit {
            max_bytes: None,
            max_lines: Some(3),
        };
        Generator::new(config.clone()).run().unwrap();

        config.resume = true;
        let summary = Generator::new(config).run().unwrap();

        assert_eq!(summary.lines, 0);
        assert!(summary.files.is_empty());
        assert_eq!(summary.estimate.lines, 4);
        assert!(!start.exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("aa-ba.txt")).unwrap(),
            "aa\nab\nba\n"
        );
    }

    #[test]
    fn test_resume_missing_single_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");

        let mut config = odometer(GenOptions::new(1, 1), path);
        config.resume = true;

        assert!(Generator::new(config).run().is_err());
    }

    #[test]
    fn test_permutation_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("perm.txt");

        let mut config = GeneratorConfig::new(GenerationMode::Permute(vec![
            "dog".to_string(),
            "cat".to_string(),
        ]));
        config.output = Some(path.clone());

        let summary = Generator::new(config).run().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "catdog\ndogcat\n");
        assert_eq!(summary.estimate.lines, 2);
    }

    #[test]
    fn test_permutation_resume_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("perm.txt");
        fs::write(&path, "ab\n").unwrap();

        let mut config = GeneratorConfig::new(GenerationMode::Permute(vec!["ab".to_string()]));
        config.output = Some(path);
        config.resume = true;

        let err = Generator::new(config).run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_stop_before_start() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        let generator = Generator::new(odometer(GenOptions::new(1, 4), path.clone()));
        generator.stop_handle().stop();
        let summary = generator.run().unwrap();

        assert!(summary.stopped);
        assert_eq!(summary.lines, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_duplicates_counted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        let opts = GenOptions::new(2, 2)
            .charset(CharsetKind::Lower, "abc")
            .duplicates(crate::duplicates::DuplicateLimits::unlimited().with(CharsetKind::Lower, 1));

        let summary = Generator::new(odometer(opts, path)).run().unwrap();
        assert_eq!(summary.lines, 6);
        assert_eq!(summary.skipped, 3);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        let err = Generator::new(odometer(GenOptions::new(3, 2), path))
            .run()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::Config { .. })
        ));
    }
}
