//! Provider identities shared by every stage of a resolve call.

use serde::{Deserialize, Serialize};

/// A third-party search provider known to the registry.
///
/// Variant order is registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// SoundCloud tracks, on by default
    SoundCloud,
    /// YouTube Data API video search, on by default
    YouTube,
    /// Mixcloud cloudcasts, off by default
    Mixcloud,
    /// Spotify tracks, off by default
    Spotify,
}

impl Provider {
    /// All providers in registry order.
    pub const ALL: [Provider; 4] = [
        Provider::SoundCloud,
        Provider::YouTube,
        Provider::Mixcloud,
        Provider::Spotify,
    ];

    /// Key used for this provider in aggregated responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::SoundCloud => "soundcloud",
            Provider::YouTube => "youtube",
            Provider::Mixcloud => "mixcloud",
            Provider::Spotify => "spotify",
        }
    }

    /// Query-string flag that selects this provider.
    pub fn flag(self) -> &'static str {
        match self {
            Provider::SoundCloud => "sc",
            Provider::YouTube => "yt",
            Provider::Mixcloud => "mixcloud",
            Provider::Spotify => "spotify",
        }
    }

    /// Position in registry order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s) || p.flag().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown provider: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_index() {
        for (position, provider) in Provider::ALL.into_iter().enumerate() {
            assert_eq!(provider.index(), position);
        }
    }

    #[test]
    fn test_parse_accepts_name_or_flag() {
        assert_eq!("soundcloud".parse(), Ok(Provider::SoundCloud));
        assert_eq!("sc".parse(), Ok(Provider::SoundCloud));
        assert_eq!("YT".parse(), Ok(Provider::YouTube));
        assert!("bandcamp".parse::<Provider>().is_err());
    }
}
