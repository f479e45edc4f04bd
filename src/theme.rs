use std::fmt;

/// Linear color with channels nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn mix(self, o: Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r * (1.0 - t) + o.r * t,
            g: self.g * (1.0 - t) + o.g * t,
            b: self.b * (1.0 - t) + o.b * t,
        }
    }

    pub fn avg(self) -> f64 {
        (self.r + self.g + self.b) / 3.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeKey {
    Dawn,
    Day,
    Dusk,
    Night,
    Rain,
}

impl TimeKey {
    pub fn all() -> &'static [TimeKey] {
        &[
            TimeKey::Dawn,
            TimeKey::Day,
            TimeKey::Dusk,
            TimeKey::Night,
            TimeKey::Rain,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeKey::Dawn => "dawn",
            TimeKey::Day => "day",
            TimeKey::Dusk => "dusk",
            TimeKey::Night => "night",
            TimeKey::Rain => "rain",
        }
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per time key.
#[derive(Clone, Copy, Debug)]
pub struct ByTime<T> {
    pub night: T,
    pub dawn: T,
    pub day: T,
    pub dusk: T,
    pub rain: T,
}

impl<T> ByTime<T> {
    pub fn get(&self, key: TimeKey) -> &T {
        match key {
            TimeKey::Night => &self.night,
            TimeKey::Dawn => &self.dawn,
            TimeKey::Day => &self.day,
            TimeKey::Dusk => &self.dusk,
            TimeKey::Rain => &self.rain,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Artwork {
    pub name: &'static str,
    pub colors: Rgb,
    pub accent: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub saturation: f64,
    pub contrast: f64,
    pub brush_stroke: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Painter {
    pub name: &'static str,
    pub style: Style,
    pub artworks: ByTime<Artwork>,
    pub descriptions: ByTime<&'static str>,
}

impl Painter {
    pub fn artwork(&self, key: TimeKey) -> &Artwork {
        self.artworks.get(key)
    }

    pub fn description(&self, key: TimeKey) -> &'static str {
        self.descriptions.get(key)
    }

    pub fn label(&self, key: TimeKey) -> String {
        format!("{} - {}", self.name, self.artwork(key).name)
    }
}

const fn art(name: &'static str, colors: Rgb, accent: Rgb) -> Artwork {
    Artwork {
        name,
        colors,
        accent,
    }
}

const DEEP_BLUE: Rgb = Rgb::new(0.1, 0.1, 0.2);
const BLUE: Rgb = Rgb::new(0.2, 0.2, 0.8);
const ORANGE: Rgb = Rgb::new(0.9, 0.6, 0.2);
const BURNT: Rgb = Rgb::new(0.8, 0.4, 0.2);
const WHITE: Rgb = Rgb::new(0.9, 0.9, 0.9);
const PURPLE: Rgb = Rgb::new(0.8, 0.2, 0.8);
const YELLOW: Rgb = Rgb::new(0.8, 0.8, 0.2);
const ICE: Rgb = Rgb::new(0.8, 0.8, 0.9);
const PINK: Rgb = Rgb::new(0.9, 0.8, 0.8);

static PAINTERS: [Painter; 5] = [
    Painter {
        name: "Beach House",
        style: Style {
            saturation: 1.3,
            contrast: 1.7,
            brush_stroke: 0.2,
        },
        artworks: ByTime {
            night: art("Dark Spring", DEEP_BLUE, PURPLE),
            dawn: art("Sunrise", ORANGE, WHITE),
            day: art("Space Song", BLUE, YELLOW),
            dusk: art("Sunset", BURNT, BLUE),
            rain: art("Rain in Numbers", BLUE, WHITE),
        },
        descriptions: ByTime {
            night: "City lights blur into constellations, carrying whispers of distant memories.",
            dawn: "First rays paint the sky in pastel hues, a gentle awakening.",
            day: "Sunlight dances through the atmosphere, softening reality.",
            dusk: "The horizon burns with the last embers of daylight.",
            rain: "Raindrops trace patterns on windows, a melancholic symphony.",
        },
    },
    Painter {
        name: "Tycho",
        style: Style {
            saturation: 1.4,
            contrast: 1.8,
            brush_stroke: 0.25,
        },
        artworks: ByTime {
            night: art("Night Sky", DEEP_BLUE, ICE),
            dawn: art("Awake", Rgb::new(0.2, 0.6, 0.8), WHITE),
            day: art("Sunrise Projector", ORANGE, BLUE),
            dusk: art("Dive", BLUE, BURNT),
            rain: art("Cloud Generator", Rgb::new(0.3, 0.3, 0.3), WHITE),
        },
        descriptions: ByTime {
            night: "Stars pulse with electronic dreams across the infinite canvas.",
            dawn: "Morning light breaks through, painting digital gradients.",
            day: "Geometric patterns of light and shadow dance across surfaces.",
            dusk: "The day dissolves into pixels of color and warmth.",
            rain: "Clouds form and disperse like data streams in the sky.",
        },
    },
    Painter {
        name: "Slowdive",
        style: Style {
            saturation: 1.2,
            contrast: 1.6,
            brush_stroke: 0.15,
        },
        artworks: ByTime {
            night: art("Star Roving", DEEP_BLUE, WHITE),
            dawn: art("Morningrise", PINK, BLUE),
            day: art("Sugar for the Pill", WHITE, PURPLE),
            dusk: art("No Longer Making Time", BURNT, BLUE),
            rain: art("When the Sun Hits", BLUE, ORANGE),
        },
        descriptions: ByTime {
            night: "Stars shimmer through layers of atmosphere like a warm blanket.",
            dawn: "Morning mist hangs between reality and memory.",
            day: "Sunlight diffuses through the haze, softening the world.",
            dusk: "Time stretches and compresses in the fading light.",
            rain: "A wall of sound echoes through the streets.",
        },
    },
    Painter {
        name: "Cigarettes After Sex",
        style: Style {
            saturation: 1.1,
            contrast: 1.5,
            brush_stroke: 0.1,
        },
        artworks: ByTime {
            night: art("Apocalypse", Rgb::new(0.1, 0.1, 0.1), ICE),
            dawn: art("Sunsetz", BURNT, BLUE),
            day: art("Sweet", WHITE, PURPLE),
            dusk: art("Heavenly", BLUE, WHITE),
            rain: art("Cry", BLUE, WHITE),
        },
        descriptions: ByTime {
            night: "The night air carries the weight of unspoken words.",
            dawn: "Morning arrives in slow motion, moments suspended.",
            day: "Long shadows of memory stretch across the ground.",
            dusk: "Reality and fantasy blur in the fading light.",
            rain: "Each drop a fragment of forgotten moments.",
        },
    },
    Painter {
        name: "M83",
        style: Style {
            saturation: 1.5,
            contrast: 1.9,
            brush_stroke: 0.3,
        },
        artworks: ByTime {
            night: art("Midnight City", DEEP_BLUE, PURPLE),
            dawn: art("Wait", PINK, BLUE),
            day: art("Outro", BLUE, WHITE),
            dusk: art("Moonchild", PURPLE, BLUE),
            rain: art("Hurry Up, We're Dreaming", BLUE, WHITE),
        },
        descriptions: ByTime {
            night: "Neon dreams pulse through the urban constellation.",
            dawn: "Morning breaks like a cinematic sequence.",
            day: "Vibrant hues paint the world in light and shadow.",
            dusk: "Time stands still in the dreamy montage.",
            rain: "Each drop a note in nature's composition.",
        },
    },
];

/// The painter rotation, in display order.
pub fn painters() -> &'static [Painter] {
    &PAINTERS
}
