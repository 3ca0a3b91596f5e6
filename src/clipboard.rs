//! Copy-to-clipboard through the terminal
//!
//! Uses the OSC 52 escape sequence, which most modern terminals (and tmux
//! with `set-clipboard on`) forward to the system clipboard. Works over SSH.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> io::Result<()>;
}

/// Clipboard backed by the controlling terminal's OSC 52 support
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(Self::sequence(text).as_bytes())?;
        stdout.flush()
    }
}
