//! Theme-color lookup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// Fill for the optional missing-artwork placeholder.
    pub const PLACEHOLDER_GRAY: Rgb = Rgb(200, 200, 200);

    /// Components scaled to 0.0..=1.0, as PDF color operators expect.
    pub fn unit(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

pub const THEME_COLORS: [(&str, Rgb); 8] = [
    ("light blue", Rgb(204, 229, 255)),
    ("light pink", Rgb(255, 204, 229)),
    ("light green", Rgb(204, 255, 204)),
    ("light yellow", Rgb(255, 255, 204)),
    ("light gray", Rgb(230, 230, 230)),
    ("light purple", Rgb(229, 204, 255)),
    ("light orange", Rgb(255, 229, 204)),
    ("white", Rgb(255, 255, 255)),
];

/// Case-insensitive lookup; unknown names resolve to white.
pub fn resolve_theme_color(name: &str) -> Rgb {
    let key = name.trim().to_lowercase();
    THEME_COLORS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, rgb)| *rgb)
        .unwrap_or(Rgb::WHITE)
}
