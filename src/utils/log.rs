//! Terminal logging with colored prefixes and progress bars.
//!
//! - `log!` prints `[module] message`, truncated to the terminal width
//! - `ProgressBars` draws one in-place bar per build phase
//!
//! ```ignore
//! log!("source"; "{} products", count);
//!
//! let progress = ProgressBars::new(&[("pages", pages.len())]);
//! progress.inc_by_name("pages");
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

// Progress bar format: "[module] [████░░░░] 42/100"

/// "[" and "]" around the module name plus the following space
const PREFIX_OVERHEAD: usize = 3;
/// " []" around the bar plus the space before the count
const BAR_OVERHEAD: usize = 4;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let max_len = terminal_width().saturating_sub(module.len() + PREFIX_OVERHEAD);
    let message = truncate_str(message, max_len);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

// ============================================================================
// Progress Bars
// ============================================================================

/// Several progress bars, one terminal line each, updated in place.
///
/// Safe to increment from rayon workers; terminal writes are serialized.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    lock: Mutex<()>,
}

struct ProgressBar {
    name: &'static str,
    prefix: ColoredString,
    total: usize,
    current: AtomicUsize,
    row: usize,
}

impl ProgressBars {
    /// Reserve one line per `(name, total)` pair.
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        let mut stdout = stdout().lock();
        for _ in modules {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();

        let bars = modules
            .iter()
            .enumerate()
            .map(|(row, &(name, total))| ProgressBar {
                name,
                prefix: colorize_prefix(name),
                total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Advance the bar registered under `name`.
    pub fn inc_by_name(&self, name: &str) {
        if let Some(bar) = self.bars.iter().find(|bar| bar.name == name) {
            let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
            self.display(bar, current);
        }
    }

    fn display(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let count = format!("{current}/{}", bar.total);
        let line = render_bar(bar.name.len(), bar.total, current, &count);

        let mut stdout = stdout().lock();
        let lines_up = (self.bars.len() - bar.row) as u16;
        execute!(stdout, cursor::MoveUp(lines_up), Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{line}] {count}", bar.prefix).ok();
        execute!(stdout, cursor::MoveDown(lines_up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear all bars from the terminal.
    pub fn finish(&self) {
        let _guard = self.lock.lock().ok();
        let rows = self.bars.len() as u16;
        if rows == 0 {
            return;
        }

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(rows)).ok();
        for _ in &self.bars {
            execute!(stdout, Clear(ClearType::CurrentLine), cursor::MoveDown(1)).ok();
        }
        execute!(stdout, cursor::MoveUp(rows)).ok();
        stdout.flush().ok();
    }
}

/// Filled/empty cells for a bar that fits next to its prefix and count.
fn render_bar(name_len: usize, total: usize, current: usize, count: &str) -> String {
    let overhead = name_len + PREFIX_OVERHEAD + BAR_OVERHEAD + count.len();
    let width = terminal_width()
        .saturating_sub(overhead)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
    let filled = if total > 0 {
        (current.min(total) * width) / total
    } else {
        0
    };

    "█".repeat(filled) + &"░".repeat(width - filled)
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold(),
        "source" => prefix.bright_cyan().bold(),
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate to at most `max_len` bytes on a char boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
        assert_eq!(truncate_str("", 3), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "€" is 3 bytes
        assert_eq!(truncate_str("€5", 2), "");
        assert_eq!(truncate_str("€5", 3), "€");
        assert_eq!(truncate_str("a€b", 4), "a€");
    }

    #[test]
    fn test_render_bar_bounds() {
        let empty = render_bar(5, 10, 0, "0/10");
        assert!(!empty.contains('█'));

        let full = render_bar(5, 10, 10, "10/10");
        assert!(!full.contains('░'));

        let over = render_bar(5, 10, 25, "25/10");
        assert_eq!(over, full);

        let cells = render_bar(5, 0, 0, "0/0").chars().count();
        assert!((MIN_BAR_WIDTH..=MAX_BAR_WIDTH).contains(&cells));
    }

    #[test]
    fn test_progress_ignores_unknown_names() {
        let progress = ProgressBars::new(&[("pages", 2)]);
        progress.inc_by_name("images");
        assert_eq!(progress.bars[0].current.load(Ordering::Relaxed), 0);
        progress.inc_by_name("pages");
        assert_eq!(progress.bars[0].current.load(Ordering::Relaxed), 1);
        progress.finish();
    }
}
