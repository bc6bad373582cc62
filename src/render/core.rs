use std::io::Write;

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::error::Result;

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Terminal columns per grid cell, including the trailing gap.
    pub cell_width: u16,
    /// Top row of the grid, zero-based.
    pub origin_row: u16,
    /// Left column of the grid, zero-based.
    pub origin_col: u16,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            cell_width: 14,
            origin_row: 1,
            origin_col: 0,
        }
    }
}

/// ANSI renderer writing grid cells directly to a terminal handle.
pub struct CellRenderer {
    settings: RendererSettings,
}

impl CellRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Write dirty cells at their grid positions. `cols` is the current
    /// column count from the grid scaler.
    pub fn render(
        &mut self,
        writer: &mut impl Write,
        cols: usize,
        dirty: &[(usize, String)],
    ) -> Result<()> {
        let cols = cols.max(1);
        let inner = self.settings.cell_width.saturating_sub(2) as usize;

        for (index, content) in dirty {
            let row = self.settings.origin_row + (index / cols) as u16;
            let col = self.settings.origin_col + ((index % cols) as u16) * self.settings.cell_width;
            let cell = fit_cell(content, inner);
            write!(writer, "\x1b[{};{}H{} ", row + 1, col + 1, cell)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write a status line below the grid.
    pub fn render_status(&mut self, writer: &mut impl Write, row: u16, text: &str) -> Result<()> {
        write!(writer, "\x1b[{};1H\x1b[2K{}", row + 1, text)?;
        writer.flush()?;
        Ok(())
    }
}

/// Width of `text` as the terminal shows it, ignoring ANSI sequences.
pub fn visible_width(text: &str) -> usize {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(text.as_bytes())).width()
}

fn fit_cell(content: &str, width: usize) -> String {
    let mut cell = content.to_string();
    if visible_width(&cell) > width {
        // Too wide: fall back to the stripped text and cut it to size, so a
        // truncation can never split an escape sequence.
        let plain = String::from_utf8_lossy(&strip_ansi_escapes::strip(content.as_bytes())).to_string();
        let mut taken = String::new();
        let mut used = 0usize;
        for ch in plain.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            taken.push(ch);
            used += w;
        }
        cell = taken;
    }

    let mut padded_width = visible_width(&cell);
    while padded_width < width {
        cell.push(' ');
        padded_width += 1;
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_land_at_their_grid_positions() {
        let mut renderer = CellRenderer::new(RendererSettings {
            cell_width: 6,
            origin_row: 0,
            origin_col: 0,
        });
        let dirty = vec![(0, "aa".to_string()), (3, "bb".to_string())];

        let mut output = Vec::new();
        renderer.render(&mut output, 2, &dirty).unwrap();
        let rendered = String::from_utf8(output).unwrap();

        // Index 0: row 0, col 0. Index 3: row 1, col 1 (cell width 6).
        assert!(rendered.contains("\u{1b}[1;1Haa"));
        assert!(rendered.contains("\u{1b}[2;7Hbb"));
    }

    #[test]
    fn styled_content_is_measured_without_escapes() {
        assert_eq!(visible_width("\x1b[7msun\x1b[0m"), 3);
    }

    #[test]
    fn overlong_content_is_cut_to_the_cell() {
        let cell = fit_cell("a very long face label", 5);
        assert_eq!(visible_width(&cell), 5);
        assert_eq!(cell, "a ver");
    }

    #[test]
    fn short_content_is_padded_to_the_cell() {
        let cell = fit_cell("ab", 4);
        assert_eq!(cell, "ab  ");
    }

    #[test]
    fn status_line_clears_before_writing() {
        let mut renderer = CellRenderer::with_default();
        let mut output = Vec::new();
        renderer.render_status(&mut output, 5, "Time spent: 0:12").unwrap();
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[6;1H"));
        assert!(rendered.contains("\u{1b}[2K"));
        assert!(rendered.contains("Time spent: 0:12"));
    }
}
