//! `sunnyctl`: drive the SunnyYummy page components from a terminal.
//!
//! Logs go to stderr; rendered markup goes to stdout.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use sunny_config::{ClientConfig, ConfigLoad, ConfigLoader, ConfigSource};
use sunny_core::{
    ApiClient, BannerCarousel, Carousel, DirectoryState, Document, GameDirectory, GameSource,
    SyncOutcome, carousel::AUTOPLAY_DELAY,
};
use sunny_model::OpaqueId;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sunnyctl", version)]
#[command(about = "Render SunnyYummy banner carousels and the game directory from the content API")]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
struct ApiArgs {
    /// Content API base URL (overrides config and SUNNY_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// HTTP timeout such as `10s` (overrides config and SUNNY_HTTP_TIMEOUT)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sync a banner page and print its carousel markup
    Banners {
        /// Page id, e.g. `advertisement` or `warehouse`
        #[arg(long)]
        page: String,

        /// Autoplay intervals to simulate after the sync
        #[arg(long, default_value_t = 0)]
        rotations: u32,
    },
    /// Load the game directory and print its markup
    Games,
    /// Record a play for a game id
    Play {
        /// Game id; numeric ids are sent as numbers
        #[arg(value_parser = parse_game_id)]
        id: OpaqueId,
    },
}

fn parse_game_id(raw: &str) -> Result<OpaqueId, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("game id must not be empty".to_string());
    }
    Ok(raw
        .parse::<i64>()
        .map(OpaqueId::Int)
        .unwrap_or_else(|_| OpaqueId::from(raw)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sunny_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli.api)?;
    let client = ApiClient::new(config.api.base_url.clone(), config.api.timeout)
        .context("failed to create API client")?;

    match cli.command {
        Command::Banners { page, rotations } => {
            run_banners(&config, client, &page, rotations).await
        }
        Command::Games => run_games(client).await,
        Command::Play { id } => run_play(client, id).await,
    }
}

fn load_config(args: &ApiArgs) -> anyhow::Result<ClientConfig> {
    let ConfigLoad {
        mut config,
        source,
        env_file,
        ..
    } = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;

    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded .env file");
    }
    if let ConfigSource::EnvPath(path) | ConfigSource::File(path) = &source {
        info!(path = %path.display(), "using config file");
    }

    if let Some(base_url) = args.base_url.clone() {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = args.timeout {
        config.api.timeout = timeout;
    }
    Ok(config)
}

async fn run_banners(
    config: &ClientConfig,
    client: ApiClient,
    page_id: &str,
    rotations: u32,
) -> anyhow::Result<()> {
    let Some(page) = config.page(page_id).cloned() else {
        let known: Vec<_> = config.pages.iter().map(|page| page.page_id.as_str()).collect();
        bail!("unknown page '{page_id}' (configured: {})", known.join(", "));
    };

    let document = Document::carousel_shell(page.anchor_id(), Vec::new());
    let (mut carousel, outcome) = BannerCarousel::<_, Carousel>::start(document, page, client)
        .await
        .context("failed to mount banner carousel")?;

    match &outcome {
        SyncOutcome::Replaced { slides } => info!(slides, "carousel populated"),
        SyncOutcome::Empty => info!("carousel left with its default slides"),
        SyncOutcome::Failed(err) => warn!(error = %err, "carousel left in its last state"),
    }

    for _ in 0..rotations {
        let widget = carousel.widget_mut();
        widget
            .advance(AUTOPLAY_DELAY)
            .context("failed to advance autoplay")?;
        let src = widget
            .active_slide()
            .and_then(|slide| slide.image_src.as_deref())
            .unwrap_or("-");
        info!(active = widget.active_index(), src, "autoplay tick");
    }

    println!("{}", carousel.carousel_html());
    Ok(())
}

async fn run_games(client: ApiClient) -> anyhow::Result<()> {
    let mut directory = GameDirectory::mount(GameDirectory::<ApiClient>::shell(), Arc::new(client))
        .context("failed to mount game directory")?;
    let state = directory.load().await.clone();

    println!("{}", directory.list_html());
    if let DirectoryState::Failed { message } = state {
        bail!("game directory failed to load: {message}");
    }
    Ok(())
}

async fn run_play(client: ApiClient, id: OpaqueId) -> anyhow::Result<()> {
    client
        .record_play(&id)
        .await
        .with_context(|| format!("failed to record play for game {id}"))?;
    info!(game = %id, "play recorded");
    Ok(())
}
