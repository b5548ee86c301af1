//! Colour values accepted by every colour field of [`crate::RenderConfig`].
//!
//! A colour is either a name (`"black"`, `"steelblue"`), a hex string
//! (`"#f00"`, `"#ff0000"`), an `rgb(r, g, b)` string, or an integer triple.
//! Names are kept verbatim so the diagram backend can write them back into
//! draw.io styles unchanged; the raster backend resolves them to RGB.

use crate::error::{ComposeError, Result};
use image::Rgb;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:([0-9a-fA-F]{3})|([0-9a-fA-F]{6}))$").unwrap());

static RGB_FN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").unwrap()
});

/// Named colours understood by both backends (CSS/X11 subset).
const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("indigo", [75, 0, 130]),
    ("violet", [238, 130, 238]),
    ("coral", [255, 127, 80]),
    ("crimson", [220, 20, 60]),
    ("darkblue", [0, 0, 139]),
    ("darkred", [139, 0, 0]),
    ("darkgreen", [0, 100, 0]),
    ("steelblue", [70, 130, 180]),
    ("skyblue", [135, 206, 235]),
    ("beige", [245, 245, 220]),
    ("ivory", [255, 255, 240]),
    ("whitesmoke", [245, 245, 245]),
];

/// A validated RGB colour that remembers how it was spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "ColorRepr")]
pub enum Color {
    /// A known colour name, stored lower-case.
    Named(String),
    /// Explicit components.
    Rgb(u8, u8, u8),
}

impl Color {
    pub fn black() -> Self {
        Color::Named("black".into())
    }

    pub fn white() -> Self {
        Color::Named("white".into())
    }

    /// Parse a colour string. See the module docs for accepted forms.
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();

        if let Some(caps) = HEX_RE.captures(t) {
            let hex = caps
                .get(1)
                .map(|m| m.as_str().chars().flat_map(|c| [c, c]).collect::<String>())
                .or_else(|| caps.get(2).map(|m| m.as_str().to_string()))
                .unwrap_or_default();
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            return match (channel(0), channel(2), channel(4)) {
                (Ok(r), Ok(g), Ok(b)) => Ok(Color::Rgb(r, g, b)),
                _ => Err(invalid(s)),
            };
        }

        if let Some(caps) = RGB_FN_RE.captures(t) {
            let comps: Vec<i64> = (1..=3)
                .filter_map(|i| caps.get(i).and_then(|m| m.as_str().parse().ok()))
                .collect();
            return Color::try_from(comps.as_slice());
        }

        let key = t.to_ascii_lowercase();
        if NAMED.iter().any(|(name, _)| *name == key) {
            return Ok(Color::Named(key));
        }

        Err(invalid(s))
    }

    /// Resolve to pixel components.
    pub fn to_rgb(&self) -> Rgb<u8> {
        match self {
            Color::Rgb(r, g, b) => Rgb([*r, *g, *b]),
            Color::Named(name) => NAMED
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, c)| Rgb(*c))
                .unwrap_or(Rgb([0, 0, 0])),
        }
    }

    /// Value written into draw.io style strings (`fillColor=…`).
    pub fn to_style_value(&self) -> String {
        match self {
            Color::Named(name) => name.clone(),
            Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

fn invalid(s: &str) -> ComposeError {
    ComposeError::InvalidConfig(format!(
        "colour must be a colour name, #rgb/#rrggbb, rgb(r, g, b) or an (r, g, b) triple; got '{s}'"
    ))
}

impl TryFrom<&[i64]> for Color {
    type Error = ComposeError;

    fn try_from(comps: &[i64]) -> Result<Self> {
        let [r, g, b] = comps else {
            return Err(ComposeError::InvalidConfig(format!(
                "colour tuple must have exactly 3 components, got {}",
                comps.len()
            )));
        };
        let channel = |v: i64| {
            u8::try_from(v).map_err(|_| {
                ComposeError::InvalidConfig(format!("colour component {v} is outside 0–255"))
            })
        };
        Ok(Color::Rgb(channel(*r)?, channel(*g)?, channel(*b)?))
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::Rgb(r, g, b)
    }
}

impl TryFrom<&str> for Color {
    type Error = ComposeError;

    fn try_from(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl FromStr for Color {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(name) => f.write_str(name),
            Color::Rgb(r, g, b) => write!(f, "rgb({r}, {g}, {b})"),
        }
    }
}

// ── Serde representation ─────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Components(Vec<i64>),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ComposeError;

    fn try_from(repr: ColorRepr) -> Result<Self> {
        match repr {
            ColorRepr::Text(s) => Color::parse(&s),
            ColorRepr::Components(c) => Color::try_from(c.as_slice()),
        }
    }
}

impl From<Color> for ColorRepr {
    fn from(c: Color) -> Self {
        match c {
            Color::Named(name) => ColorRepr::Text(name),
            Color::Rgb(r, g, b) => ColorRepr::Components(vec![r.into(), g.into(), b.into()]),
        }
    }
}
