/// 8-bit-per-channel display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a surface's coordinate space maps onto glyph cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Raster {
    /// Square pixels; the grid size is derived from the surface size.
    Pixels,
    /// Every unit is already one glyph cell. `glyph_aspect` is cell width
    /// over cell height (about 0.5 for terminal fonts).
    Cells { glyph_aspect: f64 },
}

impl Raster {
    pub fn padding(self) -> i32 {
        match self {
            Raster::Pixels => 20,
            Raster::Cells { .. } => 1,
        }
    }

    pub fn line_height(self) -> i32 {
        match self {
            Raster::Pixels => 20,
            Raster::Cells { .. } => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    pub size: u32,
    pub bold: bool,
}

impl Font {
    pub const fn regular(size: u32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: u32) -> Self {
        Self { size, bold: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

/// The drawing target. Coordinates are in surface units.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn raster(&self) -> Raster;
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb8);
    fn set_font(&mut self, font: Font);
    fn fill_text(&mut self, text: &str, x: i32, y: i32, align: TextAlign, color: Rgb8);
    fn measure_text(&self, text: &str) -> u32;
}
