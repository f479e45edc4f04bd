use crate::color::{ColorSynthesizer, Palette};
use crate::dither::HoverDither;
use crate::geometry::{Layout, ProjectedPoint, Shell, TorusSampler};
use crate::surface::{Font, Rgb8, Surface, TextAlign};

/// Sparse to dense.
pub const GLYPH_RAMP: [char; 10] = [' ', '.', ',', ':', ';', '~', '*', 'o', 'O', '@'];

pub const BACKGROUND: Rgb8 = Rgb8::new(0x1a, 0x1a, 0x1a);

/// Per-frame depth, glyph and color grids.
pub struct FrameBuffers {
    pub cols: usize,
    pub rows: usize,
    pub depth: Vec<f64>,
    pub glyph: Vec<char>,
    pub color: Vec<Rgb8>,
}

impl FrameBuffers {
    pub fn new(cols: usize, rows: usize) -> Self {
        let n = cols * rows;
        Self {
            cols,
            rows,
            depth: vec![f64::NEG_INFINITY; n],
            glyph: vec![' '; n],
            color: vec![Rgb8::WHITE; n],
        }
    }

    /// Flat index of the cell under a fractional grid position.
    pub fn idx(&self, sx: f64, sy: f64) -> Option<usize> {
        let x = sx.floor();
        let y = sy.floor();
        if x < 0.0 || y < 0.0 || x >= self.cols as f64 || y >= self.rows as f64 {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }
}

pub fn brightness(shell: Shell, phi: f64, normalized_depth: f64) -> f64 {
    let c = phi.cos();
    match shell {
        Shell::Outer => (c + 1.0) / 2.0 * (0.5 + 0.5 * normalized_depth),
        Shell::Inner => (1.0 - c) / 2.0 * (0.4 + 0.4 * normalized_depth),
    }
}

pub fn glyph_for(brightness: f64) -> char {
    let b = brightness.clamp(0.0, 1.0);
    let i = (b * (GLYPH_RAMP.len() - 1) as f64).floor() as usize;
    GLYPH_RAMP[i.min(GLYPH_RAMP.len() - 1)]
}

/// Frame-constant inputs to the rasterizer.
pub struct RasterParams<'a> {
    pub layout: &'a Layout,
    pub rotation: f64,
    pub gradient: f64,
    pub color_time: f64,
    pub palette: Palette<'a>,
    pub dither: &'a HoverDither,
}

/// Depth-tests one point. Strictly nearer points win; ties keep the first.
pub fn plot(
    buf: &mut FrameBuffers,
    p: &ProjectedPoint,
    params: &RasterParams<'_>,
    colors: &mut ColorSynthesizer,
) -> bool {
    let Some(i) = buf.idx(p.screen_x, p.screen_y) else {
        return false;
    };
    if p.depth <= buf.depth[i] {
        return false;
    }
    buf.depth[i] = p.depth;

    let nd = params.layout.torus.normalized_depth(p.depth);
    let nx = p.screen_x.floor() / buf.cols as f64;
    let ny = p.screen_y.floor() / buf.rows as f64;
    let b = brightness(p.shell, p.phi, nd) + params.dither.offset(nx, ny, params.color_time);
    buf.glyph[i] = glyph_for(b);
    buf.color[i] = colors.color(p.theta + params.gradient, p.depth, &params.palette);
    true
}

/// Builds this frame's buffers from both torus shells.
pub fn rasterize(params: &RasterParams<'_>, colors: &mut ColorSynthesizer) -> FrameBuffers {
    let layout = params.layout;
    let mut buf = FrameBuffers::new(layout.cols, layout.rows);
    if layout.is_empty() {
        return buf;
    }
    for p in TorusSampler::new(layout, params.rotation) {
        plot(&mut buf, &p, params, colors);
    }
    buf
}

/// Clears the surface and draws every cell, row-major.
pub fn blit(buf: &FrameBuffers, layout: &Layout, surface: &mut dyn Surface) {
    let (w, h) = (surface.width(), surface.height());
    surface.fill_rect(0, 0, w, h, BACKGROUND);
    surface.set_font(Font::regular(layout.grid_size));
    let g = layout.grid_size as i32;
    let mut s = [0u8; 4];
    for y in 0..buf.rows {
        for x in 0..buf.cols {
            let i = y * buf.cols + x;
            let ch = buf.glyph[i].encode_utf8(&mut s);
            surface.fill_text(ch, x as i32 * g, y as i32 * g, TextAlign::Left, buf.color[i]);
        }
    }
}
