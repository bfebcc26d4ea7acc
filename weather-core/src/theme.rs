use std::fmt;

/// Dashboard colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Saved flag if there is one, otherwise the system preference.
    pub fn resolve(saved: Option<bool>) -> Self {
        Self::from_dark(saved.unwrap_or_else(system_prefers_dark))
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        Self::from_dark(!self.is_dark())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_dark() { "dark" } else { "light" })
    }
}

/// Terminal background guess from `COLORFGBG`; light when unknown.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG").ok().and_then(|v| dark_from_colorfgbg(&v)).unwrap_or(false)
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;x;bg`). Background indices 0-6 and 8
/// are the dark half of the 16-colour palette.
pub fn dark_from_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colorfgbg() {
        assert_eq!(dark_from_colorfgbg("15;0"), Some(true));
        assert_eq!(dark_from_colorfgbg("0;15"), Some(false));
        assert_eq!(dark_from_colorfgbg("15;default;8"), Some(true));
        assert_eq!(dark_from_colorfgbg("garbage"), None);
    }

    #[test]
    fn saved_flag_overrides_system() {
        assert_eq!(Theme::resolve(Some(true)), Theme::Dark);
        assert_eq!(Theme::resolve(Some(false)), Theme::Light);
    }

    #[test]
    fn toggle_flips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().to_string(), "light");
    }
}
