//! Icons a service listing can be decorated with.

use serde::{Deserialize, Serialize};

/// Closed set of service icons.
///
/// Stored by name in the `service.icon` column. Each variant maps to an
/// inline SVG so templates never resolve icons dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceIcon {
    Code,
    Smartphone,
    Palette,
    TrendingUp,
    Shield,
    Settings,
    Cloud,
    Zap,
    Search,
    Megaphone,
}

impl ServiceIcon {
    pub const ALL: [Self; 10] = [
        Self::Code,
        Self::Smartphone,
        Self::Palette,
        Self::TrendingUp,
        Self::Shield,
        Self::Settings,
        Self::Cloud,
        Self::Zap,
        Self::Search,
        Self::Megaphone,
    ];

    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Smartphone => "smartphone",
            Self::Palette => "palette",
            Self::TrendingUp => "trending-up",
            Self::Shield => "shield",
            Self::Settings => "settings",
            Self::Cloud => "cloud",
            Self::Zap => "zap",
            Self::Search => "search",
            Self::Megaphone => "megaphone",
        }
    }

    /// Human label for the admin picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Smartphone => "Smartphone",
            Self::Palette => "Palette",
            Self::TrendingUp => "Trending up",
            Self::Shield => "Shield",
            Self::Settings => "Settings",
            Self::Cloud => "Cloud",
            Self::Zap => "Zap",
            Self::Search => "Search",
            Self::Megaphone => "Megaphone",
        }
    }

    /// Inline SVG markup (24x24, stroke follows `currentColor`).
    #[must_use]
    pub const fn svg(self) -> &'static str {
        match self {
            Self::Code => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<polyline points="16 18 22 12 16 6"/><polyline points="8 6 2 12 8 18"/></svg>"#
            ),
            Self::Smartphone => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<rect x="5" y="2" width="14" height="20" rx="2"/><path d="M12 18h.01"/></svg>"#
            ),
            Self::Palette => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<circle cx="13.5" cy="6.5" r=".5"/><circle cx="17.5" cy="10.5" r=".5"/><circle cx="8.5" cy="7.5" r=".5"/>"#,
                r#"<path d="M12 2a10 10 0 0 0 0 20c1.1 0 2-.9 2-2 0-.5-.2-1-.5-1.3-.3-.4-.5-.8-.5-1.3 0-1.1.9-2 2-2h2.3A5.7 5.7 0 0 0 22 9.7C22 5.5 17.5 2 12 2z"/></svg>"#
            ),
            Self::TrendingUp => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<polyline points="22 7 13.5 15.5 8.5 10.5 2 17"/><polyline points="16 7 22 7 22 13"/></svg>"#
            ),
            Self::Shield => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/></svg>"#
            ),
            Self::Settings => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<circle cx="12" cy="12" r="3"/><path d="M19.4 15a7.9 7.9 0 0 0 0-6l2-1.6-2-3.4-2.4 1a8 8 0 0 0-5-2.9L11.6 0h-4l-.4 2.6a8 8 0 0 0-5 2.9l-2.4-1-2 3.4 2 1.6a7.9 7.9 0 0 0 0 6"/></svg>"#
            ),
            Self::Cloud => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<path d="M17.5 19H9a7 7 0 1 1 6.7-9h1.8a4.5 4.5 0 1 1 0 9z"/></svg>"#
            ),
            Self::Zap => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<polygon points="13 2 3 14 12 14 11 22 21 10 12 10 13 2"/></svg>"#
            ),
            Self::Search => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<circle cx="11" cy="11" r="8"/><line x1="21" y1="21" x2="16.65" y2="16.65"/></svg>"#
            ),
            Self::Megaphone => concat!(
                r#"<svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true">"#,
                r#"<path d="m3 11 18-5v12L3 14v-3z"/><path d="M11.6 16.8a3 3 0 1 1-5.8-1.6"/></svg>"#
            ),
        }
    }
}

impl std::fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|icon| icon.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown service icon: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_icon_round_trips() {
        for icon in ServiceIcon::ALL {
            assert_eq!(icon.as_str().parse::<ServiceIcon>().unwrap(), icon);
            assert!(icon.svg().starts_with("<svg"));
            assert!(icon.svg().ends_with("</svg>"));
        }
    }

    #[test]
    fn test_parse_is_lenient_on_case() {
        assert_eq!("Zap".parse::<ServiceIcon>().unwrap(), ServiceIcon::Zap);
        assert_eq!(
            "TRENDING-UP".parse::<ServiceIcon>().unwrap(),
            ServiceIcon::TrendingUp
        );
    }

    #[test]
    fn test_unknown_icon() {
        assert!("rocket".parse::<ServiceIcon>().is_err());
    }
}
