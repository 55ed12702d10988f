//! Progress display module
//!
//! Styled status messages, progress bars and the end-of-run summary. Every
//! message goes to stderr; stdout is reserved for generated candidates.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║   ██╗    ██╗ ██████╗ ██████╗ ██████╗      ██████╗ ███████╗   ║
║   ██║    ██║██╔═══██╗██╔══██╗██╔══██╗    ██╔════╝ ██╔════╝   ║
║   ██║ █╗ ██║██║   ██║██████╔╝██║  ██║    ██║  ███╗█████╗     ║
║   ██║███╗██║██║   ██║██╔══██╗██║  ██║    ██║   ██║██╔══╝     ║
║   ╚███╔███╔╝╚██████╔╝██║  ██║██████╔╝    ╚██████╔╝███████╗   ║
║    ╚══╝╚══╝  ╚═════╝ ╚═╝  ╚═╝╚═════╝      ╚═════╝ ╚══════╝   ║
║                                                              ║
║            Combinatorial Wordlist Generation                 ║
║                                              v1.0.0          ║
╚══════════════════════════════════════════════════════════════╝
"#;

    eprintln!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    eprintln!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    eprintln!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    eprintln!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    eprintln!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    eprintln!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar counting generated lines
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());

    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {human_pos}/{human_len} ({percent}%, {per_sec}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Generation statistics, shared between the producer and the writer thread
#[derive(Debug)]
pub struct GenerationStats {
    pub generated_lines: AtomicU64,
    pub skipped_lines: AtomicU64,
    pub written_bytes: AtomicU64,
    pub files: AtomicU64,
    pub start_time: Instant,
}

impl GenerationStats {
    pub fn new() -> Self {
        Self {
            generated_lines: AtomicU64::new(0),
            skipped_lines: AtomicU64::new(0),
            written_bytes: AtomicU64::new(0),
            files: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_lines(&self, count: u64, bytes: u64) {
        self.generated_lines.fetch_add(count, Ordering::Relaxed);
        self.written_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn set_skipped(&self, count: u64) {
        self.skipped_lines.store(count, Ordering::Relaxed);
    }

    pub fn set_files(&self, count: u64) {
        self.files.store(count, Ordering::Relaxed);
    }

    pub fn get_generated_lines(&self) -> u64 {
        self.generated_lines.load(Ordering::Relaxed)
    }

    pub fn get_skipped_lines(&self) -> u64 {
        self.skipped_lines.load(Ordering::Relaxed)
    }

    pub fn get_written_bytes(&self) -> u64 {
        self.written_bytes.load(Ordering::Relaxed)
    }

    pub fn get_files(&self) -> u64 {
        self.files.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn lines_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.get_generated_lines() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics
    pub fn print_summary(&self, stopped: bool) {
        let title = if stopped {
            "                 GENERATION STOPPED".yellow().bold()
        } else {
            "                 GENERATION COMPLETE".green().bold()
        };

        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
        eprintln!("{}", title);
        eprintln!("{}", "═".repeat(60).green());
        eprintln!();

        eprintln!(
            "  {} {}",
            "Lines written:  ".green(),
            format_number(self.get_generated_lines()).green().bold()
        );
        eprintln!(
            "  {} {}",
            "Data written:   ".green(),
            ByteSize(self.get_written_bytes())
        );

        let skipped = self.get_skipped_lines();
        if skipped > 0 {
            eprintln!(
                "  {} {}",
                "Duplicates cut: ".yellow(),
                format_number(skipped)
            );
        }

        let files = self.get_files();
        if files > 0 {
            eprintln!("  {} {}", "Files:          ".green(), files);
        }

        eprintln!();
        eprintln!(
            "  {} {}",
            "Duration:       ".green(),
            format_duration(self.elapsed())
        );
        eprintln!(
            "  {} {:.2} lines/sec",
            "Throughput:     ".green(),
            self.lines_per_second()
        );
        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
    }
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
pub fn format_number<N: ToString>(n: N) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format a byte count that may exceed `u64`
pub fn format_bytes(bytes: u128) -> String {
    match u64::try_from(bytes) {
        Ok(b) => ByteSize(b).to_string(),
        Err(_) => format!("{} bytes", format_number(bytes)),
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0u64), "0");
        assert_eq!(format_number(123u64), "123");
        assert_eq!(format_number(1234u64), "1,234");
        assert_eq!(format_number(1234567u128), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_format_bytes_beyond_u64() {
        assert!(format_bytes(u128::from(u64::MAX) + 1).ends_with(" bytes"));
        assert_eq!(format_bytes(0), ByteSize(0).to_string());
    }

    #[test]
    fn test_stats() {
        let stats = GenerationStats::new();

        stats.add_lines(100, 300);
        stats.add_lines(1, 3);
        stats.set_skipped(7);
        stats.set_files(2);

        assert_eq!(stats.get_generated_lines(), 101);
        assert_eq!(stats.get_written_bytes(), 303);
        assert_eq!(stats.get_skipped_lines(), 7);
        assert_eq!(stats.get_files(), 2);
    }
}
