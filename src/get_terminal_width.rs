use terminal_size::{Width, terminal_size};

const FALLBACK_WIDTH: usize = 100;

/// The width of the terminal on stdout, minus `margin`, for clap's
/// help wrapping. Falls back to a fixed width when not on a terminal.
pub fn get_terminal_width(margin: usize) -> usize {
    match terminal_size() {
        Some((Width(w), _)) => usize::from(w).saturating_sub(margin).max(40),
        None => FALLBACK_WIDTH,
    }
}
