// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("static regex"));

/// An opaque RGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Used for categories without an assigned color.
    pub const GRAY: Rgb = Rgb(0x80, 0x80, 0x80);

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #RRGGBB")]
pub struct InvalidColor(pub String);

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = HEX_COLOR
            .captures(trimmed)
            .ok_or_else(|| InvalidColor(s.to_string()))?;
        let v = u32::from_str_radix(&caps[1], 16).map_err(|_| InvalidColor(s.to_string()))?;
        Ok(Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = InvalidColor;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Colors handed out to new categories, in order, wrapping around.
pub const PALETTE: [Rgb; 15] = [
    Rgb(0xFF, 0x3B, 0x30), // red
    Rgb(0xFF, 0x95, 0x00), // orange
    Rgb(0xFF, 0xCC, 0x00), // yellow
    Rgb(0x34, 0xC7, 0x59), // green
    Rgb(0x00, 0x7A, 0xFF), // blue
    Rgb(0x58, 0x56, 0xD6), // indigo
    Rgb(0xAF, 0x52, 0xDE), // purple
    Rgb(0xFF, 0x2D, 0x55), // pink
    Rgb(0x30, 0xB0, 0xC7), // teal
    Rgb(0xA2, 0x84, 0x5E), // brown
    Rgb(0x32, 0xAD, 0xE6), // cyan
    Rgb(0x00, 0xC7, 0xBE), // mint
    Rgb(0xFF, 0x00, 0xFF), // magenta
    Rgb(0x8E, 0x8E, 0x93), // gray
    Rgb(0x00, 0x00, 0x00), // black
];

pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}
