use std::f64::consts::TAU;

use crate::surface::Raster;

/// Samples per torus parameter.
pub const STEPS: usize = 60;

/// Surface width below which pixel surfaces use the compact profile.
const COMPACT_PX: u32 = 768;
/// Same threshold for cell surfaces, in columns.
const COMPACT_COLS: u32 = 96;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusParams {
    /// Major (ring) radius.
    pub major: f64,
    /// Minor (tube) radius.
    pub minor: f64,
    pub fov: f64,
    pub camera_distance: f64,
}

impl TorusParams {
    pub fn for_profile(compact: bool) -> Self {
        if compact {
            Self {
                major: 0.7,
                minor: 0.35,
                fov: 2.2,
                camera_distance: 3.8,
            }
        } else {
            Self {
                major: 0.55,
                minor: 0.28,
                fov: 1.9,
                camera_distance: 4.2,
            }
        }
    }

    /// Maps a rotated depth to roughly `[0, 1]`, far to near.
    pub fn normalized_depth(&self, depth: f64) -> f64 {
        (depth + self.camera_distance) / (2.0 * self.camera_distance)
    }

    fn cull_depth(&self) -> f64 {
        -self.camera_distance * 0.8
    }
}

/// Glyph grid and projection constants for one surface size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// Surface units per grid cell.
    pub grid_size: u32,
    pub cols: usize,
    pub rows: usize,
    pub aspect_ratio: f64,
    pub compact: bool,
    pub torus: TorusParams,
}

impl Layout {
    pub fn compute(width: u32, height: u32, raster: Raster) -> Self {
        let (compact, grid_size, glyph_aspect) = match raster {
            Raster::Pixels => {
                let compact = width < COMPACT_PX;
                let div = if compact { 40 } else { 60 };
                (compact, (width.min(height) / div).max(1), 1.0)
            }
            Raster::Cells { glyph_aspect } => (width < COMPACT_COLS, 1, glyph_aspect),
        };
        let cols = (width / grid_size) as usize;
        let rows = (height / grid_size) as usize;
        let aspect_ratio = if rows == 0 {
            1.0
        } else {
            cols as f64 / rows as f64 * glyph_aspect
        };
        Self {
            width,
            height,
            grid_size,
            cols,
            rows,
            aspect_ratio,
            compact,
            torus: TorusParams::for_profile(compact),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Outer,
    Inner,
}

#[derive(Clone, Copy, Debug)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Rotation about the vertical axis; `y` is left alone.
    pub fn rot_y(self, ang: f64) -> Vec3 {
        let (s, c) = ang.sin_cos();
        Vec3 {
            x: self.x * c - self.z * s,
            y: self.y,
            z: self.x * s + self.z * c,
        }
    }
}

pub fn surface_point(shell: Shell, theta: f64, phi: f64, layout: &Layout) -> Vec3 {
    let t = &layout.torus;
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    let (ring, z) = match shell {
        Shell::Outer => (t.major + t.minor * cos_p, t.minor * sin_p),
        Shell::Inner => (t.major - t.minor * cos_p, -t.minor * sin_p),
    };
    Vec3 {
        x: ring * cos_t,
        y: ring * sin_t * layout.aspect_ratio,
        z,
    }
}

/// Perspective projection into fractional grid coordinates.
pub fn project(p: Vec3, layout: &Layout) -> (f64, f64) {
    let t = &layout.torus;
    let scale = t.fov / (t.camera_distance + p.z);
    let sx = (p.x * scale + 1.0) * layout.cols as f64 / 2.0;
    let sy = (p.y * scale + 1.0) * layout.rows as f64 / 2.0;
    (sx, sy)
}

#[derive(Clone, Copy, Debug)]
pub struct ProjectedPoint {
    pub screen_x: f64,
    pub screen_y: f64,
    pub depth: f64,
    pub theta: f64,
    pub phi: f64,
    pub shell: Shell,
}

/// Lazily walks both shells: outer first, then theta and phi ascending.
/// Points behind the camera cutoff are skipped.
pub struct TorusSampler<'a> {
    layout: &'a Layout,
    angle: f64,
    n: usize,
}

impl<'a> TorusSampler<'a> {
    pub fn new(layout: &'a Layout, angle: f64) -> Self {
        Self {
            layout,
            angle,
            n: 0,
        }
    }
}

impl Iterator for TorusSampler<'_> {
    type Item = ProjectedPoint;

    fn next(&mut self) -> Option<ProjectedPoint> {
        const PER_SHELL: usize = STEPS * STEPS;
        while self.n < 2 * PER_SHELL {
            let n = self.n;
            self.n += 1;

            let shell = if n < PER_SHELL { Shell::Outer } else { Shell::Inner };
            let k = n % PER_SHELL;
            let theta = (k / STEPS) as f64 / STEPS as f64 * TAU;
            let phi = (k % STEPS) as f64 / STEPS as f64 * TAU;

            let p = surface_point(shell, theta, phi, self.layout).rot_y(self.angle);
            if p.z <= self.layout.torus.cull_depth() {
                continue;
            }
            let (screen_x, screen_y) = project(p, self.layout);
            return Some(ProjectedPoint {
                screen_x,
                screen_y,
                depth: p.z,
                theta,
                phi,
                shell,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(w: u32, h: u32) -> Layout {
        Layout::compute(w, h, Raster::Cells { glyph_aspect: 0.5 })
    }

    #[test]
    fn pixel_layout_matches_grid_rules() {
        let wide = Layout::compute(1920, 1080, Raster::Pixels);
        assert!(!wide.compact);
        assert_eq!(wide.grid_size, 18);
        assert_eq!((wide.cols, wide.rows), (106, 60));
        assert!((wide.aspect_ratio - 106.0 / 60.0).abs() < 1e-12);
        assert_eq!(wide.torus, TorusParams::for_profile(false));

        let phone = Layout::compute(390, 844, Raster::Pixels);
        assert!(phone.compact);
        assert_eq!(phone.grid_size, 9);
        assert_eq!((phone.cols, phone.rows), (43, 93));
        assert_eq!(phone.torus.major, 0.7);
    }

    #[test]
    fn tiny_pixel_surface_keeps_unit_grid() {
        let l = Layout::compute(30, 20, Raster::Pixels);
        assert_eq!(l.grid_size, 1);
        assert_eq!((l.cols, l.rows), (30, 20));
    }

    #[test]
    fn cell_layout_corrects_for_glyph_shape() {
        let l = term(120, 40);
        assert_eq!((l.cols, l.rows), (120, 40));
        assert!((l.aspect_ratio - 1.5).abs() < 1e-12);
        assert!(!l.compact);
        assert!(term(80, 24).compact);
    }

    #[test]
    fn resize_is_idempotent() {
        for (w, h, r) in [
            (1280, 720, Raster::Pixels),
            (500, 900, Raster::Pixels),
            (100, 30, Raster::Cells { glyph_aspect: 0.5 }),
        ] {
            assert_eq!(Layout::compute(w, h, r), Layout::compute(w, h, r));
        }
    }

    #[test]
    fn zero_rows_is_empty_not_nan() {
        let l = term(80, 0);
        assert!(l.is_empty());
        assert!(l.aspect_ratio.is_finite());
    }

    #[test]
    fn rotation_keeps_y_and_length() {
        let p = Vec3 { x: 0.3, y: -0.7, z: 0.4 };
        let r = p.rot_y(1.234);
        assert_eq!(r.y, p.y);
        let l0 = p.x * p.x + p.z * p.z;
        let l1 = r.x * r.x + r.z * r.z;
        assert!((l0 - l1).abs() < 1e-12);
    }

    #[test]
    fn projected_points_are_finite() {
        for layout in [term(120, 40), Layout::compute(390, 844, Raster::Pixels)] {
            for step in 0..64 {
                let angle = step as f64 * 0.37;
                for p in TorusSampler::new(&layout, angle) {
                    assert!(p.screen_x.is_finite() && p.screen_y.is_finite());
                    assert!(p.depth > -0.8 * layout.torus.camera_distance);
                }
            }
        }
    }

    #[test]
    fn sampler_visits_outer_then_inner() {
        let layout = term(120, 40);
        let pts: Vec<_> = TorusSampler::new(&layout, 0.0).collect();
        // the torus sits well in front of the cutoff, so nothing is culled
        assert_eq!(pts.len(), 2 * STEPS * STEPS);
        let first_inner = pts
            .iter()
            .position(|p| p.shell == Shell::Inner)
            .expect("inner shell");
        assert_eq!(first_inner, STEPS * STEPS);
        assert!(pts[first_inner..].iter().all(|p| p.shell == Shell::Inner));
        assert_eq!(pts[1].theta, 0.0);
        assert!(pts[1].phi > pts[0].phi);
    }

    #[test]
    fn close_camera_culls_far_side() {
        let mut layout = term(120, 40);
        layout.torus.camera_distance = 0.5;
        let pts: Vec<_> = TorusSampler::new(&layout, 0.0).collect();
        assert!(pts.len() < 2 * STEPS * STEPS);
        assert!(pts.iter().all(|p| p.depth > -0.4));
    }
}
