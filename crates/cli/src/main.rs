mod app;
mod config;
mod locale;
mod persistence;
mod repl;
mod session;
#[cfg(test)]
mod testing;

use anyhow::Context;
use app::{App, DrawAction};
use clap::{Parser, Subcommand};
use config::{AppConfig, PlatformSetting};
use locale::UiLocale;
use outs_core::RngState;
use outs_render::{
    probe_platform, ClipboardDelivery, ClipboardHold, FsImageLoader, Pipeline, SystemClipboard,
    TileComposer,
};
use session::Session;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "outs", about = "Draw cards from a 36-card deck and copy their images")]
struct CliArgs {
    /// Config file (defaults to $OUTS_CONFIG or ~/.config/outs/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message language: en or ru
    #[arg(short, long)]
    lang: Option<String>,

    /// Fixed RNG seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Clipboard route, overriding the config file
    #[arg(long, value_enum)]
    platform: Option<PlatformSetting>,

    /// Directory holding the card images
    #[arg(long)]
    deck_dir: Option<PathBuf>,

    /// Keep drawn cards across runs
    #[arg(long)]
    persist: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the opening cards
    Initial,
    /// Draw one more card
    Addon,
    /// Copy cards that are already out again
    Select { numbers: Vec<String> },
    /// Start a new round
    Reset,
    /// List the cards out so far
    Outs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = CliArgs::parse();
    let config_path = args.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    apply_overrides(&mut config, &args);
    config.validate().context("validating config")?;

    let locale = UiLocale::from_opt(args.lang.as_deref().or(config.locale.as_deref()));
    // One-shot commands exit right after copying, so their writes wait for
    // the clipboard to be taken over.
    let hold = if args.command.is_some() {
        ClipboardHold::UntilReplaced
    } else {
        ClipboardHold::Session
    };
    let mut app = build_app(&config, locale, hold)?;
    log::info!("locale {}, seed {}", locale.code(), app.seed());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    match args.command {
        None => repl::run_repl(&mut app, &mut input, &mut output).await?,
        Some(Command::Initial) => {
            repl::run_action(&mut app, DrawAction::Initial, &mut input, &mut output).await?
        }
        Some(Command::Addon) => {
            repl::run_action(&mut app, DrawAction::Addon, &mut input, &mut output).await?
        }
        Some(Command::Select { numbers }) => {
            let action = DrawAction::Selected(numbers.join(" "));
            repl::run_action(&mut app, action, &mut input, &mut output).await?
        }
        Some(Command::Reset) => {
            app.new_round();
            writeln!(output, "{}", locale.text("New round started", "Новый раунд"))?;
        }
        Some(Command::Outs) => repl::print_outs(&app, &mut output)?,
    }
    output.flush()?;
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &CliArgs) {
    if let Some(seed) = args.seed {
        config.draw.seed = Some(seed);
    }
    if let Some(platform) = args.platform {
        config.clipboard.platform = platform;
    }
    if let Some(dir) = args.deck_dir.clone() {
        config.deck.dir = dir;
    }
    if args.persist {
        config.persistence.enabled = true;
    }
}

fn build_app(
    config: &AppConfig,
    locale: UiLocale,
    hold: ClipboardHold,
) -> anyhow::Result<App<FsImageLoader, SystemClipboard>> {
    let capabilities = config
        .clipboard
        .platform
        .capabilities()
        .unwrap_or_else(probe_platform);
    log::info!("clipboard route {:?}", capabilities.route());

    let deck = config.deck_registry().context("building deck")?;
    let loader = Arc::new(FsImageLoader::with_root(&config.deck.dir));
    let composer = TileComposer::new(loader).with_load_window(config.compose.load_concurrency);
    let clipboard = SystemClipboard::spawn(hold).context("starting clipboard worker")?;
    let mut delivery = ClipboardDelivery::new(clipboard, capabilities);
    if let Some(dir) = config.clipboard.preview_dir.as_ref() {
        delivery = delivery.with_preview_dir(dir);
    }
    let pipeline =
        Pipeline::new(deck, composer, delivery).with_initial_size(config.draw.initial_size);

    let session = if config.persistence.enabled {
        let path = config
            .persistence
            .path
            .clone()
            .or_else(persistence::default_state_path)
            .context("no place to save outs: set persistence.path or $HOME")?;
        Session::persistent(path)
            .map_err(anyhow::Error::msg)
            .context("restoring saved outs")?
    } else {
        Session::new()
    };

    let rng = match config.draw.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    Ok(App::new(locale, session, pipeline, rng))
}
