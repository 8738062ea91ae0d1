//! badge-render: write tray icons and window badges to PNG files.

use std::path::PathBuf;
use std::process::ExitCode;

use badge_renderer::{IconRenderer, IconSet, RendererConfig, Result, SvgSource};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "badge-render")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON renderer configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base icon SVG, overriding the configuration
    #[arg(short, long)]
    icon: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Fail instead of rendering blank when the base icon cannot be loaded
    #[arg(long)]
    strict: bool,

    /// Log cache and render activity
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tray icon at every default size
    Tray {
        /// Unread messages shown in the badge
        unread: i32,

        /// Unread private messages
        #[arg(long, default_value_t = 0)]
        pms: i32,
    },

    /// 48x48 window badge
    WinBadge {
        /// Unread messages printed on the badge
        count: i32,
    },

    /// Person icon at every default size
    Person,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("badge-render: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RendererConfig::from_file(path)?,
        None => RendererConfig::default(),
    };
    if let Some(icon) = cli.icon {
        config.icon = Some(SvgSource::from_path(icon));
    }

    let mut renderer = if cli.strict {
        IconRenderer::try_new(config)?
    } else {
        IconRenderer::new(config)
    };

    let (icon, stem): (std::sync::Arc<IconSet>, String) = match cli.command {
        Commands::Tray { unread, pms } => (renderer.icon(unread, pms), format!("tray-{unread}-{pms}")),
        Commands::WinBadge { count } => (renderer.win_badge_icon(count), format!("win-badge-{count}")),
        Commands::Person => (renderer.person_icon(), "person".to_string()),
    };

    std::fs::create_dir_all(&cli.out)
        .map_err(|err| badge_renderer::Error::Io { path: cli.out.clone(), source: err })?;
    for path in icon.save_pngs(&cli.out, &stem)? {
        info!("wrote {}", path.display());
        println!("{}", path.display());
    }
    Ok(())
}
