//! Static provider registry and per-provider request construction.

use tracklist_core::ProviderCredentials;

use crate::query::Query;
use crate::types::Provider;

/// Static description of one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDescriptor {
    /// Provider this entry describes
    pub provider: Provider,
    /// Whether the provider is queried when the caller sends no flag for it
    pub enabled_by_default: bool,
    /// Largest result count the provider accepts
    pub max_results: u32,
    /// Host the provider API is served from
    pub host: &'static str,
    /// Whether the credential travels as a bearer token instead of in the path
    pub bearer_auth: bool,
    path: fn(&PathParams<'_>) -> String,
}

/// Values substituted into a provider path template. All strings are
/// already percent-encoded.
struct PathParams<'a> {
    query: &'a str,
    limit: u32,
    credential: &'a str,
}

/// Providers in registry order.
pub const REGISTRY: [ProviderDescriptor; 4] = [
    ProviderDescriptor {
        provider: Provider::SoundCloud,
        enabled_by_default: true,
        max_results: 100,
        host: "api.soundcloud.com",
        bearer_auth: false,
        path: soundcloud_path,
    },
    ProviderDescriptor {
        provider: Provider::YouTube,
        enabled_by_default: true,
        max_results: 50,
        host: "www.googleapis.com",
        bearer_auth: false,
        path: youtube_path,
    },
    ProviderDescriptor {
        provider: Provider::Mixcloud,
        enabled_by_default: false,
        max_results: 100,
        host: "api.mixcloud.com",
        bearer_auth: false,
        path: mixcloud_path,
    },
    ProviderDescriptor {
        provider: Provider::Spotify,
        enabled_by_default: false,
        max_results: 50,
        host: "api.spotify.com",
        bearer_auth: true,
        path: spotify_path,
    },
];

fn soundcloud_path(p: &PathParams<'_>) -> String {
    format!(
        "tracks/?q={}&limit={}&client_id={}",
        p.query, p.limit, p.credential
    )
}

fn youtube_path(p: &PathParams<'_>) -> String {
    format!(
        "youtube/v3/search?part=snippet&q={}&key={}&maxResults={}",
        p.query, p.credential, p.limit
    )
}

fn mixcloud_path(p: &PathParams<'_>) -> String {
    format!("search/?q={}&type=cloudcast&limit={}", p.query, p.limit)
}

fn spotify_path(p: &PathParams<'_>) -> String {
    format!("v1/search/?q={}&type=track&limit={}", p.query, p.limit)
}

/// Looks up the static descriptor of a provider.
pub fn descriptor(provider: Provider) -> &'static ProviderDescriptor {
    &REGISTRY[provider.index()]
}

impl ProviderDescriptor {
    /// Clamps a requested limit to what this provider accepts.
    pub fn clamp_limit(&self, requested: u32) -> u32 {
        requested.min(self.max_results)
    }

    /// Credential configured for this provider, if any.
    pub fn credential<'a>(&self, credentials: &'a ProviderCredentials) -> Option<&'a str> {
        match self.provider {
            Provider::SoundCloud => credentials.soundcloud_client_id.as_deref(),
            Provider::YouTube => credentials.youtube_api_key.as_deref(),
            Provider::Spotify => credentials.spotify_token.as_deref(),
            Provider::Mixcloud => None,
        }
    }

    /// Builds the request for `query`.
    pub fn build_request(
        &self,
        query: &Query,
        credentials: &ProviderCredentials,
    ) -> ProviderRequest {
        let limit = self.clamp_limit(query.limit());
        let credential = self.credential(credentials);
        let encoded_query = urlencoding::encode(query.text());

        let (path_credential, bearer_token) = if self.bearer_auth {
            (String::new(), credential.map(str::to_string))
        } else {
            (
                urlencoding::encode(credential.unwrap_or_default()).into_owned(),
                None,
            )
        };

        let path = (self.path)(&PathParams {
            query: &encoded_query,
            limit,
            credential: &path_credential,
        });

        ProviderRequest {
            provider: self.provider,
            host: self.host,
            path,
            limit,
            bearer_token,
        }
    }
}

/// Fully formed request for one provider. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Provider the request targets
    pub provider: Provider,
    /// Provider API host
    pub host: &'static str,
    /// Path and query string, without a leading slash
    pub path: String,
    /// Result limit after clamping
    pub limit: u32,
    /// Credential sent as `Authorization: Bearer`, if the provider uses one
    pub bearer_token: Option<String>,
}

impl ProviderRequest {
    /// Target URL on the provider's own host.
    pub fn url(&self) -> String {
        format!("https://{}/{}", self.host, self.path)
    }

    /// Target URL, optionally redirected to another origin.
    pub fn url_with_origin(&self, origin: Option<&str>) -> String {
        match origin {
            Some(origin) => format!("{}/{}", origin.trim_end_matches('/'), self.path),
            None => self.url(),
        }
    }
}

impl std::fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The path carries credentials for some providers.
        f.debug_struct("ProviderRequest")
            .field("provider", &self.provider)
            .field("host", &self.host)
            .field("limit", &self.limit)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<set>"))
            .finish_non_exhaustive()
    }
}

/// Builds one request per selected provider, in registry order.
pub fn requests_for(query: &Query, credentials: &ProviderCredentials) -> Vec<ProviderRequest> {
    REGISTRY
        .iter()
        .filter(|d| query.selection().is_selected(d.provider))
        .map(|d| d.build_request(query, credentials))
        .collect()
}
