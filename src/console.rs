use crate::driver::Surface;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

pub const BANNER: &str = "🌍 AI Travel Guru 🚀\n\"Plan Smarter, Travel Better!\" ✈️🌟";
pub const FOOTER: &str = "🚀 Powered by Google Gemini 🌍✨\n💡 Travel more, worry less! 🌟";

/// Line-oriented surface: a spinner on stderr while waiting, sections on `out`.
pub struct ConsoleSurface<W: Write> {
    out: W,
    spinner: Option<ProgressBar>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, spinner: None }
    }

    pub fn banner(&mut self) {
        writeln!(self.out, "{BANNER}\n").ok();
    }

    pub fn footer(&mut self) {
        writeln!(self.out, "{FOOTER}").ok();
        self.out.flush().ok();
    }

    fn clear_spinner(&mut self) {
        if let Some(sp) = self.spinner.take() {
            sp.finish_and_clear();
        }
    }
}

impl<W: Write + Send> Surface for ConsoleSurface<W> {
    fn warn(&mut self, message: &str) {
        self.clear_spinner();
        eprintln!("{message}");
    }

    fn progress(&mut self, message: &str) {
        self.clear_spinner();
        let sp = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            sp.set_style(style);
        }
        sp.set_message(message.to_string());
        sp.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(sp);
    }

    fn show(&mut self, heading: &str, body: &str) {
        self.clear_spinner();
        // A closed stdout (e.g. `| head`) is not worth failing the run over.
        writeln!(self.out, "{heading}\n\n{body}\n").ok();
        self.out.flush().ok();
    }
}

impl<W: Write> Drop for ConsoleSurface<W> {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_written_verbatim_under_heading() {
        let mut buf = Vec::new();
        {
            let mut ui = ConsoleSurface::new(&mut buf);
            ui.progress("⏳ Checking flight schedules...");
            ui.show("🌟 Your AI-Powered Travel Guide:", "Option A: Flight, $50, 2h");
        }
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "🌟 Your AI-Powered Travel Guide:\n\nOption A: Flight, $50, 2h\n\n");
    }

    #[test]
    fn warnings_stay_off_stdout() {
        let mut buf = Vec::new();
        {
            let mut ui = ConsoleSurface::new(&mut buf);
            ui.warn("⚠️ Please enter both source and destination locations to proceed!");
        }
        assert!(buf.is_empty());
    }
}
