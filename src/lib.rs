//! Animated ASCII torus painted with album-art palettes. The palette follows
//! the local time of day and, when it is raining, the weather.

pub mod app;
pub mod clock;
pub mod color;
pub mod config;
pub mod dither;
pub mod driver;
pub mod geometry;
pub mod overlay;
pub mod raster;
pub mod surface;
pub mod temporal;
pub mod term;
pub mod theme;
pub mod transition;
pub mod weather;
