//! Terminal rendering for notifications.

use std::io::{self, IsTerminal, Write};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use hamburgueria_core::notify::parse_hex_color;
use hamburgueria_core::{Notifier, NotifyError, Toast};

/// Shows toasts on stderr, coloured from the toast style when stderr is a TTY
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

fn color(value: &str, fallback: Color) -> Color {
    parse_hex_color(value)
        .map(|(r, g, b)| Color::Rgb { r, g, b })
        .unwrap_or(fallback)
}

impl Notifier for TerminalNotifier {
    fn success(&self, toast: &Toast) -> Result<(), NotifyError> {
        let mut stderr = io::stderr();

        if !stderr.is_terminal() {
            writeln!(stderr, "✓ {}", toast.message)?;
            return Ok(());
        }

        execute!(
            stderr,
            SetBackgroundColor(color(&toast.style.background, Color::DarkGrey)),
            SetForegroundColor(color(&toast.style.color, Color::White)),
            Print(format!(" ✓ {} ", toast.message)),
            ResetColor,
            Print("\n"),
        )?;
        Ok(())
    }
}
