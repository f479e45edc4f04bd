use chrono::NaiveDateTime;

use crate::geometry::Layout;
use crate::surface::{Font, Raster, Rgb8, Surface, TextAlign};
use crate::weather::WeatherSnapshot;

const INFO: Rgb8 = Rgb8::new(220, 220, 220);
const LABEL: Rgb8 = Rgb8::new(255, 255, 255);
const DESCRIPTION: Rgb8 = Rgb8::new(200, 200, 200);

/// Everything the overlay prints this frame.
pub struct OverlayText<'a> {
    pub location: &'a str,
    pub weather: Option<&'a WeatherSnapshot>,
    pub now: NaiveDateTime,
    pub label: &'a str,
    pub description: &'a str,
}

/// "May 1, 2024 14:03:09"
pub fn clock_line(now: &NaiveDateTime) -> String {
    now.format("%b %-d, %Y %H:%M:%S").to_string()
}

/// Greedy word wrap against the surface's own text metrics.
pub fn wrap_text(surface: &dyn Surface, text: &str, max_width: u32) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut line = words.next().unwrap_or_default().to_string();
    for word in words {
        let candidate = format!("{line} {word}");
        if surface.measure_text(&candidate) < max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    lines
}

pub fn draw(surface: &mut dyn Surface, layout: &Layout, text: &OverlayText<'_>) {
    let raster = surface.raster();
    let pad = raster.padding();
    let lh = raster.line_height();
    let width = surface.width() as i32;
    let (info_font, label_font, desc_font) = match raster {
        Raster::Pixels => (Font::regular(14), Font::bold(14), Font::regular(12)),
        Raster::Cells { .. } => (Font::regular(1), Font::bold(1), Font::regular(1)),
    };

    surface.set_font(info_font);
    surface.fill_text(text.location, pad, pad + lh, TextAlign::Left, INFO);
    let mut y = pad + lh * 2;
    if let Some(w) = text.weather {
        surface.fill_text(&w.summary(), pad, y, TextAlign::Left, INFO);
        y += lh;
    }
    surface.fill_text(&clock_line(&text.now), pad, y, TextAlign::Left, INFO);

    if layout.compact {
        let label_y = y + lh;
        surface.set_font(label_font);
        surface.fill_text(text.label, pad, label_y, TextAlign::Left, LABEL);

        surface.set_font(desc_font);
        let max_w = (width - pad * 2).max(1) as u32;
        for (i, line) in wrap_text(surface, text.description, max_w).iter().enumerate() {
            let ly = label_y + lh + i as i32 * lh;
            surface.fill_text(line, pad, ly, TextAlign::Left, DESCRIPTION);
        }
    } else {
        let right = width - pad;
        surface.set_font(label_font);
        surface.fill_text(text.label, right, pad + lh, TextAlign::Right, LABEL);

        surface.set_font(desc_font);
        let max_w = (width / 2 - pad).max(1) as u32;
        for (i, line) in wrap_text(surface, text.description, max_w).iter().enumerate() {
            let ly = pad + lh * 2 + i as i32 * lh;
            surface.fill_text(line, right, ly, TextAlign::Right, DESCRIPTION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(14, 3, 9))
            .expect("valid")
    }

    const DESC: &str = "Sunlight dances through the atmosphere, softening reality.";

    #[test]
    fn clock_line_format() {
        assert_eq!(clock_line(&noon()), "May 1, 2024 14:03:09");
    }

    #[test]
    fn wrap_respects_measured_width() {
        let s = RecordingSurface::cells(80, 24);
        let lines = wrap_text(&s, DESC, 20);
        assert!(lines.len() > 2);
        for l in &lines[..lines.len() - 1] {
            assert!(s.measure_text(l) < 20, "{l:?}");
        }
        assert_eq!(lines.join(" "), DESC);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let s = RecordingSurface::cells(80, 24);
        let lines = wrap_text(&s, "a supercalifragilistic b", 8);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wide_layout_puts_label_top_right() {
        let layout = Layout::compute(120, 40, Raster::Cells { glyph_aspect: 0.5 });
        let mut s = RecordingSurface::cells(120, 40);
        let snap = WeatherSnapshot::Unknown;
        draw(
            &mut s,
            &layout,
            &OverlayText {
                location: "New York, NY",
                weather: Some(&snap),
                now: noon(),
                label: "Tycho - Awake",
                description: DESC,
            },
        );
        assert_eq!(s.texts[0].text, "New York, NY");
        assert_eq!(s.texts[1].text, "unknown • --°F");
        assert_eq!(s.texts[2].text, "May 1, 2024 14:03:09");
        let label = &s.texts[3];
        assert_eq!(label.text, "Tycho - Awake");
        assert_eq!((label.x, label.y, label.align), (119, 2, TextAlign::Right));
        assert!(label.font.bold);
        assert!(s.texts[4..].iter().all(|t| t.align == TextAlign::Right));
    }

    #[test]
    fn compact_layout_stacks_without_weather() {
        let layout = Layout::compute(60, 30, Raster::Cells { glyph_aspect: 0.5 });
        assert!(layout.compact);
        let mut s = RecordingSurface::cells(60, 30);
        draw(
            &mut s,
            &layout,
            &OverlayText {
                location: "Here",
                weather: None,
                now: noon(),
                label: "M83 - Wait",
                description: DESC,
            },
        );
        let ys: Vec<i32> = s.texts.iter().map(|t| t.y).collect();
        assert_eq!(&ys[..3], &[2, 3, 4]);
        assert_eq!(s.texts[1].text, "May 1, 2024 14:03:09");
        assert_eq!(s.texts[2].text, "M83 - Wait");
        assert!(s.texts.iter().all(|t| t.x == 1 && t.align == TextAlign::Left));
        assert!(s.texts[3..].iter().all(|t| t.text.chars().count() < 58));
    }
}
