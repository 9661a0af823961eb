//! flixdeck - TMDB catalog browser CLI.

/// Application configuration (TOML).
mod config;
/// Built-in `shows` section sets.
mod presets;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, ENV_TOKEN, TmdbConfig, resolve_config_path};
use crate::presets::Preset;
use flixdeck_api::catalog::{
    CatalogSession, ShowRequest, image_url, name_from_show, watch_path, watch_path_for,
};
use flixdeck_api::tmdb::{MediaType, Show, TmdbClient};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch catalog sections (config `[[sections]]` or a preset page).
    Shows(ShowsArgs),
    /// Search movies, TV series and people.
    Search(SearchArgs),
    /// Resolve a watch page path to its movie or TV series.
    Find(FindArgs),
    /// Show details with videos and keywords.
    Details(DetailsArgs),
    /// List the episodes of a TV season.
    Season(SeasonArgs),
    /// List the keywords of a movie or TV series.
    Keywords(KeywordsArgs),
    /// Pick a random popular title.
    Random,
}

/// Arguments for the `shows` subcommand.
#[derive(clap::Args)]
struct ShowsArgs {
    /// Preset page. Defaults to config sections, or `home` when none are set.
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Also list sections marked hidden.
    #[arg(long)]
    all: bool,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "the batman").
    #[arg(long, required = true)]
    query: String,
    /// Result page (default: 1).
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `find` subcommand.
#[derive(clap::Args)]
struct FindArgs {
    /// TMDB id.
    #[arg(long, required = true)]
    id: u64,
    /// Watch page path (e.g. "/watch/movie/603-the-matrix").
    #[arg(long, required = true)]
    path: String,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB id.
    #[arg(long, required = true)]
    id: u64,
    /// `movie`, `tv` or `anime`.
    #[arg(long, required = true)]
    media_type: MediaType,
}

/// Arguments for the `season` subcommand.
#[derive(clap::Args)]
struct SeasonArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
    /// Season number.
    #[arg(long, required = true)]
    season: u32,
}

/// Arguments for the `keywords` subcommand.
#[derive(clap::Args)]
struct KeywordsArgs {
    /// TMDB id.
    #[arg(long, required = true)]
    id: u64,
    /// `movie`, `tv` or `anime`.
    #[arg(long, required = true)]
    media_type: MediaType,
}

/// Loads the config file and applies environment overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok(AppConfig {
        tmdb: config.tmdb.with_env(|name| std::env::var(name).ok()),
        ..config
    })
}

/// Builds a `TmdbClient` from the merged TMDB configuration.
///
/// # Errors
///
/// Returns an error if no token is configured or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(tmdb: &TmdbConfig) -> Result<TmdbClient> {
    let Some(api_token) = tmdb.api_token.as_deref() else {
        bail!("{ENV_TOKEN} environment variable or [tmdb].api_token in config is required");
    };

    let mut builder = TmdbClient::builder().api_token(api_token).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(api_key) = tmdb.api_key.as_deref() {
        builder = builder.api_key(api_key);
    }
    builder.build().context("failed to build TMDB client")
}

/// Formats a listing row.
///
/// `fallback` is used when the show carries no media type, as anime
/// discover listings do.
fn show_row(show: &Show, fallback: Option<MediaType>) -> String {
    let media_type = show.media_type.or(fallback);
    format!(
        "{}\t{:.1}\t{}\t{}\t{}",
        show.id,
        show.popularity,
        media_type.map_or("-", MediaType::as_str),
        name_from_show(show),
        media_type.map_or_else(|| String::from("-"), |m| watch_path_for(show, m)),
    )
}

/// Picks the sections `shows` fetches.
fn resolve_sections(preset: Option<Preset>, config: &AppConfig) -> Vec<ShowRequest> {
    match preset {
        Some(p) => p.sections(),
        None if !config.sections.is_empty() => config.show_requests(),
        None => Preset::Home.sections(),
    }
}

/// Runs the `shows` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build.
#[instrument(skip_all)]
async fn run_shows(args: &ShowsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let sections = resolve_sections(args.preset, &config);
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let categorized = session
        .get_shows(&sections)
        .await
        .context("failed to fetch sections")?;

    for (request, section) in sections
        .iter()
        .zip(&categorized)
        .filter(|(_, s)| s.visible || args.all)
    {
        tracing::info!("== {} ({} shows) ==", section.title, section.shows.len());
        tracing::info!("ID\tPop.\tType\tName\tWatch");
        for show in &section.shows {
            tracing::info!("{}", show_row(show, Some(request.req.media_type)));
        }
    }
    let hidden = categorized.iter().filter(|s| !s.visible).count();
    if hidden > 0 && !args.all {
        tracing::info!("{hidden} hidden section(s) not shown, use --all to list them");
    }

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank, the TMDB client fails to build,
/// or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.query.trim().is_empty() {
        bail!("search query must not be blank");
    }

    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let response = session
        .search_movies(&args.query, args.page)
        .await
        .context("TMDB search/multi request failed")?;

    tracing::info!(
        "Page {}/{} ({} results)",
        response.page,
        response.total_pages,
        response.total_results
    );
    tracing::info!("ID\tPop.\tType\tName\tWatch");
    for show in &response.results {
        tracing::info!("{}", show_row(show, None));
    }

    Ok(())
}

/// Runs the `find` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or no title matches.
#[instrument(skip_all)]
async fn run_find(args: &FindArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let show = session.find_current_movie(args.id, &args.path).await?;

    tracing::info!("ID: {}", show.id);
    tracing::info!("Name: {}", name_from_show(&show));
    tracing::info!("Type: {}", show.media_type.map_or("-", MediaType::as_str));
    tracing::info!(
        "Released: {}",
        show.release_date
            .as_deref()
            .or(show.first_air_date.as_deref())
            .unwrap_or("-")
    );
    tracing::info!("Overview: {}", show.overview.as_deref().unwrap_or("-"));
    if let Some(keywords) = &show.keywords {
        let names: Vec<&str> = keywords.iter().map(|k| k.name.as_str()).collect();
        tracing::info!("Keywords: {}", names.join(", "));
    }

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let details = session
        .find_by_id_and_type(args.id, args.media_type)
        .await
        .context("TMDB details request failed")?;
    let show = &details.show;

    tracing::info!("ID: {}", show.id);
    tracing::info!("Name: {}", name_from_show(show));
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", genres.join(", "));
    if let Some(runtime) = details.runtime {
        tracing::info!("Runtime: {runtime}min");
    }
    if let Some(seasons) = details.number_of_seasons {
        tracing::info!("Seasons: {seasons}");
    }
    if let Some(poster) = show.poster_path.as_deref() {
        tracing::info!(
            "Poster: {}",
            image_url(config.tmdb.image_domain(), "w500", poster)
        );
    }
    for video in details.videos.iter().flat_map(|v| &v.results) {
        if video.site == "YouTube" && video.kind == "Trailer" {
            tracing::info!(
                "Trailer: {} (https://www.youtube.com/watch?v={})",
                video.name,
                video.key
            );
        }
    }
    if let Some(keywords) = &show.keywords {
        let names: Vec<&str> = keywords.iter().map(|k| k.name.as_str()).collect();
        tracing::info!("Keywords: {}", names.join(", "));
    }

    Ok(())
}

/// Runs the `season` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_season(args: &SeasonArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let season = session
        .season(args.id, args.season)
        .await
        .context("TMDB tv season request failed")?;

    tracing::info!(
        "Season {}: {}",
        season.season_number,
        season.name.as_deref().unwrap_or("-")
    );
    tracing::info!("Episodes:");
    for ep in &season.episodes {
        tracing::info!(
            "  E{:02}: {} (air_date: {}, runtime: {}min)",
            ep.episode_number,
            ep.name,
            ep.air_date.as_deref().unwrap_or("-"),
            ep.runtime
                .map_or_else(|| String::from("-"), |r| r.to_string()),
        );
    }

    Ok(())
}

/// Runs the `keywords` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_keywords(args: &KeywordsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let keywords = session
        .keywords(args.id, args.media_type)
        .await
        .context("TMDB keywords request failed")?;

    tracing::info!("ID\tKeyword");
    for keyword in keywords.iter() {
        tracing::info!("{}\t{}", keyword.id, keyword.name);
    }

    Ok(())
}

/// Runs the `random` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or a listing fails.
#[instrument(skip_all)]
async fn run_random(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;
    let session = CatalogSession::new(&client);

    let picked = session
        .random_show(|len| rand::rng().random_range(0..len))
        .await
        .context("failed to fetch random candidates")?;

    match picked.as_ref().and_then(watch_path) {
        Some(path) => tracing::info!("{path}"),
        None => tracing::warn!("No titles available to pick from"),
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Shows(args) => run_shows(&args, dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Find(args) => run_find(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Season(args) => run_season(&args, dir).await,
        Commands::Keywords(args) => run_keywords(&args, dir).await,
        Commands::Random => run_random(dir).await,
    }
}
