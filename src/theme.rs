//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Block colours plus the handful of UI colours the board needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Indexed by a cell's colour id: cyan, blue, orange, yellow, green, purple, red.
    pub blocks: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Border and empty-cell dots.
    pub grid: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Landing shadow and dimmed stack after game over.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Colour palette override applied on top of the loaded theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// btop keys tried for each block colour, first match wins.
const BLOCK_KEYS: [&[&str]; 7] = [
    &["hi_fg", "proc_misc"],
    &["cpu_box"],
    &["temp_mid", "cpu_mid"],
    &["title"],
    &["mem_box", "cpu_start"],
    &["net_box"],
    &["cpu_end", "temp_end"],
];

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// One Dark flavoured defaults for the classic tetromino colours.
    pub fn onedark_default() -> Self {
        Self {
            blocks: [
                rgb(0x56B6C2), // cyan
                rgb(0x61AFEF), // blue
                rgb(0xD19A66), // orange
                rgb(0xE5C07B), // yellow
                rgb(0x98C379), // green
                rgb(0xC678DD), // purple
                rgb(0xE06C75), // red
            ],
            bg: rgb(0x282C34),
            grid: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            _ => Self::onedark_default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override block colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.blocks = [
                    rgb(0x00FFFF),
                    rgb(0x0055FF),
                    rgb(0xFF8800),
                    rgb(0xFFFF00),
                    rgb(0x00FF00),
                    rgb(0xCC00FF),
                    rgb(0xFF0000),
                ];
                self.bg = Color::Black;
            }
            Palette::Colorblind => {
                // Okabe-Ito: distinguishable without relying on red/green.
                self.blocks = [
                    rgb(0x56B4E9),
                    rgb(0x0072B2),
                    rgb(0xE69F00),
                    rgb(0xF0E442),
                    rgb(0x009E73),
                    rgb(0xCC79A7),
                    rgb(0xD55E00),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::onedark_default();
        let mut blocks = defaults.blocks;
        for (slot, keys) in blocks.iter_mut().zip(BLOCK_KEYS) {
            if let Some(c) = keys.iter().find_map(|&k| get(k)) {
                *slot = c;
            }
        }
        Self {
            blocks,
            bg: get("main_bg").or_else(|| get("meter_bg")).unwrap_or(defaults.bg),
            grid: get("div_line").unwrap_or(defaults.grid),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            inactive_fg: get("inactive_fg").unwrap_or(defaults.inactive_fg),
        }
    }

    /// Colour for a cell's colour id.
    #[inline]
    pub fn block_color(&self, index: u8) -> Color {
        self.blocks[(index as usize) % self.blocks.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some((key, rest)) = stripped.split_once(']') else {
            continue;
        };
        let Some((_, value)) = rest.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            map.insert(key.trim().to_string(), value.to_string());
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_theme_from_map_overrides_blocks() {
        let map = parse_theme_file(
            r##"
            # comment
            theme[hi_fg]="#010203"
            theme[cpu_end]='#0A0B0C'
            theme[div_line]="#111"
            "##,
        );
        let theme = Theme::from_map(&map);
        assert_eq!(theme.block_color(0), Color::Rgb(1, 2, 3));
        assert_eq!(theme.block_color(6), Color::Rgb(10, 11, 12));
        assert_eq!(theme.grid, Color::Rgb(17, 17, 17));
        assert_eq!(theme.block_color(1), Theme::onedark_default().blocks[1]);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let theme = Theme::load(Some(Path::new("/nonexistent/blockfall.theme")), Palette::Normal)
            .unwrap();
        assert_eq!(theme, Theme::default());
    }
}
