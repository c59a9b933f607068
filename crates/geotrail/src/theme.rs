//! Display palettes.
//!
//! The palette is a pure function of the stored dark-mode flag. Nothing here
//! is persisted; presentation code derives it each time it renders.

use serde::Serialize;

/// Colors presentation code renders with. Values are `#RRGGBB` hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    /// Palette name.
    pub name: &'static str,
    /// Whether this is the dark palette.
    pub dark: bool,
    /// Screen background.
    pub background: &'static str,
    /// Text and icons on the background.
    pub on_background: &'static str,
    /// Cards and list rows.
    pub surface: &'static str,
    /// Buttons and switches.
    pub primary: &'static str,
    /// Text on primary-colored controls.
    pub on_primary: &'static str,
}

const LIGHT: ThemePalette = ThemePalette {
    name: "light",
    dark: false,
    background: "#FFFBFE",
    on_background: "#1C1B1F",
    surface: "#F3EDF7",
    primary: "#6750A4",
    on_primary: "#FFFFFF",
};

const DARK: ThemePalette = ThemePalette {
    name: "dark",
    dark: true,
    background: "#1C1B1F",
    on_background: "#E6E1E5",
    surface: "#2B2930",
    primary: "#D0BCFF",
    on_primary: "#381E72",
};

/// The palette for the given dark-mode flag.
#[must_use]
pub fn derive_theme(dark_mode: bool) -> ThemePalette {
    if dark_mode {
        DARK
    } else {
        LIGHT
    }
}
