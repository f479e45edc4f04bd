use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

use crate::surface::{Font, Raster, Rgb8, Surface, TextAlign};

/// Terminal glyphs are roughly twice as tall as they are wide.
pub const GLYPH_ASPECT: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return None;
        }
        let i = self.idx(x as u16, y as u16);
        self.cells.get_mut(i)
    }
}

/// In-memory cell grid that accepts surface draw calls.
pub struct CellCanvas {
    buf: CellBuffer,
    font: Font,
    mono: bool,
}

impl CellCanvas {
    pub fn new(cols: u16, rows: u16, mono: bool) -> Self {
        Self {
            buf: CellBuffer::new(cols, rows),
            font: Font::regular(1),
            mono,
        }
    }

    fn color(&self, c: Rgb8) -> Color {
        if self.mono {
            Color::Reset
        } else {
            Color::Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            }
        }
    }

    /// Row contents as plain text.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.buf.h {
            return String::new();
        }
        let start = self.buf.idx(0, y);
        self.buf.cells[start..start + self.buf.w as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }
}

impl Surface for CellCanvas {
    fn width(&self) -> u32 {
        self.buf.w as u32
    }

    fn height(&self) -> u32 {
        self.buf.h as u32
    }

    fn raster(&self) -> Raster {
        Raster::Cells {
            glyph_aspect: GLYPH_ASPECT,
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb8) {
        let bg = self.color(color);
        for yy in y..y.saturating_add(h as i32) {
            for xx in x..x.saturating_add(w as i32) {
                if let Some(c) = self.buf.get_mut(xx, yy) {
                    *c = Cell {
                        ch: ' ',
                        fg: Color::Reset,
                        bg,
                        bold: false,
                    };
                }
            }
        }
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    /// `y` is the text row; right-aligned text ends just before `x`.
    fn fill_text(&mut self, text: &str, x: i32, y: i32, align: TextAlign, color: Rgb8) {
        let fg = self.color(color);
        let bold = self.font.bold;
        let start = match align {
            TextAlign::Left => x,
            TextAlign::Right => x - self.measure_text(text) as i32,
        };
        for (i, ch) in text.chars().enumerate() {
            if let Some(c) = self.buf.get_mut(start + i as i32, y) {
                c.ch = ch;
                c.fg = fg;
                c.bold = bold;
            }
        }
    }

    fn measure_text(&self, text: &str) -> u32 {
        text.chars().count() as u32
    }
}

/// Alternate-screen terminal with a diffing cell presenter.
pub struct TerminalSurface {
    out: io::Stdout,
    canvas: CellCanvas,
    prev: CellBuffer,
    full_redraw: bool,
}

impl TerminalSurface {
    pub fn begin(mono: bool) -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            EnableFocusChange,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            canvas: CellCanvas::new(cols, rows, mono),
            prev: CellBuffer::new(cols, rows),
            full_redraw: true,
        })
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableFocusChange,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.canvas.buf.w && rows == self.canvas.buf.h {
            return;
        }
        let mono = self.canvas.mono;
        self.canvas = CellCanvas::new(cols, rows, mono);
        self.prev = CellBuffer::new(cols, rows);
        self.full_redraw = true;
    }

    /// Writes changed cells inside one synchronized update.
    pub fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        if self.full_redraw {
            queue!(self.out, Clear(ClearType::All))?;
        }

        let cur = &self.canvas.buf;
        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = None;

        for y in 0..cur.h {
            for x in 0..cur.w {
                let i = cur.idx(x, y);
                let c = cur.cells[i];
                if !self.full_redraw && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_bold != Some(c.bold) {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = Some(c.bold);
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&cur.cells);
        self.full_redraw = false;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn raster(&self) -> Raster {
        self.canvas.raster()
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb8) {
        self.canvas.fill_rect(x, y, w, h, color);
    }

    fn set_font(&mut self, font: Font) {
        self.canvas.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, align: TextAlign, color: Rgb8) {
        self.canvas.fill_text(text, x, y, align, color);
    }

    fn measure_text(&self, text: &str) -> u32 {
        self.canvas.measure_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_aligned_text_ends_at_anchor() {
        let mut c = CellCanvas::new(12, 3, false);
        c.fill_text("abc", 11, 1, TextAlign::Right, Rgb8::WHITE);
        assert_eq!(c.row_text(1), "        abc ");
    }

    #[test]
    fn clips_at_edges() {
        let mut c = CellCanvas::new(5, 2, false);
        c.fill_text("overflow", 2, 0, TextAlign::Left, Rgb8::WHITE);
        c.fill_text("gone", 0, 7, TextAlign::Left, Rgb8::WHITE);
        c.fill_text("xyz", 1, 1, TextAlign::Right, Rgb8::WHITE);
        assert_eq!(c.row_text(0), "  ove");
        assert_eq!(c.row_text(1), "z    ");
    }

    #[test]
    fn text_keeps_background_and_takes_font_weight() {
        let mut c = CellCanvas::new(4, 1, false);
        c.fill_rect(0, 0, 4, 1, Rgb8::new(26, 26, 26));
        c.set_font(Font::bold(1));
        c.fill_text("@", 0, 0, TextAlign::Left, Rgb8::new(1, 2, 3));
        let cell = c.buf.cells[0];
        assert!(cell.bold);
        assert_eq!(cell.fg, Color::Rgb { r: 1, g: 2, b: 3 });
        assert_eq!(cell.bg, Color::Rgb { r: 26, g: 26, b: 26 });
    }

    #[test]
    fn mono_drops_colors() {
        let mut c = CellCanvas::new(2, 1, true);
        c.fill_rect(0, 0, 2, 1, Rgb8::new(26, 26, 26));
        c.fill_text("o", 1, 0, TextAlign::Left, Rgb8::new(200, 10, 10));
        assert!(c.buf.cells.iter().all(|c| c.fg == Color::Reset && c.bg == Color::Reset));
    }

    #[test]
    fn cell_raster_reports_glyph_aspect() {
        let c = CellCanvas::new(80, 24, false);
        assert_eq!(c.raster(), Raster::Cells { glyph_aspect: 0.5 });
        assert_eq!((c.width(), c.height()), (80, 24));
    }
}
