//! Terminal rendering module for rich markdown output
//!
//! Views from `healthie_core::display` are Markdown. With colors enabled
//! they go through termimad; otherwise they are printed as is.

use std::fmt::Display;

use anyhow::Result;
use healthie_core::display::{Notice, NoticeLevel};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Green);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.quote_mark.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: impl Display) -> Result<()> {
        let markdown = markdown.to_string();
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        // Headers keep their hash marks; everything between them is one
        // termimad block so tables render as tables.
        let mut block = String::new();
        for line in markdown.lines() {
            if line.starts_with('#') {
                self.flush(&mut block);
                println!("\x1b[32m{line}\x1b[0m");
            } else {
                block.push_str(line);
                block.push('\n');
            }
        }
        self.flush(&mut block);
        Ok(())
    }

    /// Render a one-line notice, colored by level.
    pub fn notice(&self, notice: &Notice) -> Result<()> {
        if !self.rich_enabled {
            print!("{notice}");
            return Ok(());
        }
        let color = match notice.level {
            NoticeLevel::Success => 32,
            NoticeLevel::Warning => 33,
            NoticeLevel::Error => 31,
        };
        print!("\x1b[{color}m{notice}\x1b[0m");
        Ok(())
    }

    fn flush(&self, block: &mut String) {
        if !block.is_empty() {
            self.skin.print_text(block.as_str());
            block.clear();
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(renderer.render("# Title\n").is_ok());
        assert!(renderer.notice(&Notice::success("done")).is_ok());
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }
}
