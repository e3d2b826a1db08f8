//! Query normalization: raw request parameters into a typed [`Query`].
//!
//! Selection flags arrive as query-string text. Providers that are enabled by
//! default stay enabled unless their flag is the literal string `"false"`;
//! providers that are disabled by default are enabled by any non-empty flag
//! value, `"false"` included.

use serde::Deserialize;

use crate::errors::NormalizationError;
use crate::registry::descriptor;
use crate::types::Provider;

/// Result limit used when none (or an invalid one) is requested.
pub const DEFAULT_LIMIT: u32 = 10;

/// Raw `/resolve` parameters, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveParams {
    /// Free-text search query
    pub q: Option<String>,
    /// Requested results per provider, unparsed
    pub limit: Option<String>,
    /// SoundCloud flag
    pub sc: Option<String>,
    /// YouTube flag
    pub yt: Option<String>,
    /// Mixcloud flag
    pub mixcloud: Option<String>,
    /// Spotify flag
    pub spotify: Option<String>,
}

impl ResolveParams {
    /// Creates parameters for a query with every flag left at its default.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    /// Sets the raw limit value.
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Sets the raw selection flag of a provider.
    pub fn with_flag(mut self, provider: Provider, value: impl Into<String>) -> Self {
        *self.flag_mut(provider) = Some(value.into());
        self
    }

    /// Raw flag value of a provider, if the caller sent one.
    pub fn flag(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::SoundCloud => self.sc.as_deref(),
            Provider::YouTube => self.yt.as_deref(),
            Provider::Mixcloud => self.mixcloud.as_deref(),
            Provider::Spotify => self.spotify.as_deref(),
        }
    }

    fn flag_mut(&mut self, provider: Provider) -> &mut Option<String> {
        match provider {
            Provider::SoundCloud => &mut self.sc,
            Provider::YouTube => &mut self.yt,
            Provider::Mixcloud => &mut self.mixcloud,
            Provider::Spotify => &mut self.spotify,
        }
    }
}

/// Which providers a query fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderSelection {
    enabled: [bool; Provider::ALL.len()],
}

impl ProviderSelection {
    /// Selection with every provider disabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Selection with each provider at its registry default.
    pub fn defaults() -> Self {
        let mut selection = Self::none();
        for provider in Provider::ALL {
            selection.set(provider, descriptor(provider).enabled_by_default);
        }
        selection
    }

    /// Applies the asymmetric text-flag rule to raw parameters.
    pub fn from_params(params: &ResolveParams) -> Self {
        let mut selection = Self::none();
        for provider in Provider::ALL {
            let raw = params.flag(provider);
            let enabled = if descriptor(provider).enabled_by_default {
                raw != Some("false")
            } else {
                raw.is_some_and(|value| !value.is_empty())
            };
            selection.set(provider, enabled);
        }
        selection
    }

    /// Returns a copy with `provider` switched on or off.
    pub fn with(mut self, provider: Provider, enabled: bool) -> Self {
        self.set(provider, enabled);
        self
    }

    fn set(&mut self, provider: Provider, enabled: bool) {
        self.enabled[provider.index()] = enabled;
    }

    /// Check if a provider is selected.
    pub fn is_selected(&self, provider: Provider) -> bool {
        self.enabled[provider.index()]
    }

    /// Selected providers in registry order.
    pub fn selected(&self) -> impl Iterator<Item = Provider> + '_ {
        Provider::ALL.into_iter().filter(|p| self.is_selected(*p))
    }

    /// Number of selected providers.
    pub fn count(&self) -> usize {
        self.enabled.iter().filter(|enabled| **enabled).count()
    }
}

/// Normalized search query for one resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    limit: u32,
    selection: ProviderSelection,
}

impl Query {
    /// Creates a query directly from typed values.
    ///
    /// # Errors
    /// - `NormalizationError::MissingQuery` - `text` is empty
    pub fn new(
        text: impl Into<String>,
        limit: u32,
        selection: ProviderSelection,
    ) -> Result<Self, NormalizationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(NormalizationError::MissingQuery);
        }

        Ok(Self {
            text,
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            selection,
        })
    }

    /// Raw search text, not yet encoded.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Requested result limit before per-provider clamping.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Providers this query fans out to.
    pub fn selection(&self) -> &ProviderSelection {
        &self.selection
    }
}

/// Normalizes raw resolve parameters.
///
/// # Errors
/// - `NormalizationError::MissingQuery` - `q` is absent or empty
pub fn normalize(params: &ResolveParams) -> Result<Query, NormalizationError> {
    let text = params
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or(NormalizationError::MissingQuery)?;

    Query::new(
        text,
        parse_limit(params.limit.as_deref()),
        ProviderSelection::from_params(params),
    )
}

/// Parses a positive integer limit, falling back to [`DEFAULT_LIMIT`].
pub fn parse_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_LIMIT)
}
