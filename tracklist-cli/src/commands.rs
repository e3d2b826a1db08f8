//! CLI command implementations

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use tracklist_core::TracklistConfig;
use tracklist_search::{CancellationToken, Provider, ResolveParams, TrackResolver};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the resolve API
    Serve {
        /// Host to bind to, overrides TRACKLIST_HOST
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to, overrides APP_PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Resolve a query once and print the JSON response
    Resolve(ResolveArgs),
}

/// Arguments of `tracklist resolve`, mirroring the `/resolve` parameters.
#[derive(Args)]
pub struct ResolveArgs {
    /// Free-text search query
    query: String,
    /// Requested results per provider
    #[arg(short, long)]
    limit: Option<String>,
    /// SoundCloud flag, "false" disables it
    #[arg(long)]
    sc: Option<String>,
    /// YouTube flag, "false" disables it
    #[arg(long)]
    yt: Option<String>,
    /// Any non-empty value enables Mixcloud
    #[arg(long)]
    mixcloud: Option<String>,
    /// Any non-empty value enables Spotify
    #[arg(long)]
    spotify: Option<String>,
}

impl ResolveArgs {
    fn into_params(self) -> ResolveParams {
        let flags = [
            (Provider::SoundCloud, self.sc),
            (Provider::YouTube, self.yt),
            (Provider::Mixcloud, self.mixcloud),
            (Provider::Spotify, self.spotify),
        ];

        let mut params = ResolveParams::new(self.query);
        params.limit = self.limit;
        for (provider, value) in flags {
            if let Some(value) = value {
                params = params.with_flag(provider, value);
            }
        }
        params
    }
}

/// Runs the selected command.
///
/// # Errors
/// Returns the first failure of the command, with context
pub async fn run_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Resolve(args) => resolve_once(&args.into_params()).await,
    }
}

/// Serves the API until Ctrl-C.
///
/// # Errors
/// - Invalid configuration
/// - Listener could not bind or the accept loop failed
pub async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = TracklistConfig::from_env();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            return;
        }
        tracing::info!("Shutdown requested");
        on_signal.cancel();
    });

    tracklist_web::run_server(config, shutdown)
        .await
        .context("Tracklist API failed")
}

/// Resolves one query and prints the response body.
///
/// # Errors
/// - Invalid configuration or HTTP client setup failure
/// - The response status is not 200
pub async fn resolve_once(params: &ResolveParams) -> anyhow::Result<()> {
    let config = TracklistConfig::from_env();
    config.validate()?;

    let resolver = TrackResolver::from_config(&config)?;
    let cancel = CancellationToken::new();
    let response = resolver.resolve(params, &cancel).await?;

    let body = serde_json::to_string_pretty(&response.body())?;
    println!("{body}");

    if !response.is_success() {
        bail!("resolve failed with status {}", response.status());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tracklist_search::{ProviderSelection, normalize};

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["tracklist"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().command
    }

    fn resolve_args(command: Commands) -> ResolveArgs {
        match command {
            Commands::Resolve(args) => args,
            Commands::Serve { .. } => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_resolve_flags_map_to_params() {
        let params = resolve_args(parse(&[
            "resolve",
            "boards of canada",
            "--limit",
            "25",
            "--sc",
            "false",
            "--spotify",
            "1",
        ]))
        .into_params();

        assert_eq!(params.q.as_deref(), Some("boards of canada"));
        assert_eq!(params.limit.as_deref(), Some("25"));
        assert_eq!(params.flag(Provider::SoundCloud), Some("false"));
        assert_eq!(params.flag(Provider::YouTube), None);
        assert_eq!(params.flag(Provider::Spotify), Some("1"));

        let query = normalize(&params).unwrap();
        let expected = ProviderSelection::defaults()
            .with(Provider::SoundCloud, false)
            .with(Provider::Spotify, true);
        assert_eq!(query.selection(), &expected);
        assert_eq!(query.limit(), 25);
    }

    #[test]
    fn test_resolve_without_flags_uses_defaults() {
        let params = resolve_args(parse(&["resolve", "x"])).into_params();
        let query = normalize(&params).unwrap();

        assert_eq!(query.selection(), &ProviderSelection::defaults());
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn test_serve_overrides_are_optional() {
        match parse(&["serve", "--port", "9000"]) {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            Commands::Resolve(_) => panic!("expected serve"),
        }
    }
}
