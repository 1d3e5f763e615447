#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use adlad_dummy::ads::banner::BannerSlot;
use adlad_dummy::ads::{AdPlugin, ShowAdResult, TracingHost};
use adlad_dummy::config::{parse_log_level, AppConfig};
use adlad_dummy::gui::{EditorCommand, EditorProcess, EguiSurface};
use adlad_dummy::settings::edit;
use adlad_dummy::settings::{Catalog, CatalogProfile, SettingId, SettingsStore, SharedSettings};

#[derive(Parser, Debug)]
#[command(name = "adlad-dummy", version, about = "Dummy ad provider for testing ad integrations")]
struct Cli {
    /// Catalog defaults to use (standard or development)
    #[arg(long, global = true)]
    profile: Option<CatalogProfile>,

    /// Directory holding the persisted settings
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every setting with its current value
    List,
    /// Print the current value of one setting
    Get { id: String },
    /// Change one setting
    Set { id: String, value: String },
    /// Open the settings window
    Configure,
    /// Simulate showing an ad and print the result as JSON
    Show {
        #[arg(value_enum)]
        kind: AdKind,
        /// Number of consecutive calls
        #[arg(long, default_value_t = 1)]
        repeat: u32,
        /// Delay between calls in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },
    /// Print a banner placeholder as SVG
    Banner {
        #[arg(long, default_value = "banner")]
        id: String,
        #[arg(long, default_value_t = 320)]
        width: u32,
        #[arg(long, default_value_t = 50)]
        height: u32,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum AdKind {
    FullScreen,
    Rewarded,
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = parse_log_level(level);
    }
    config
}

fn open_settings(config: &AppConfig) -> SharedSettings {
    let catalog = Rc::new(Catalog::new(config.profile));
    SharedSettings::new(SettingsStore::new(catalog, Box::new(config.storage())))
}

fn build_plugin(config: &AppConfig, settings: &SharedSettings) -> Result<AdPlugin> {
    let editor = EditorProcess::new(EditorCommand::current_exe()?, config.storage_dir.clone());
    Ok(AdPlugin::new(
        settings.clone(),
        Rc::new(TracingHost),
        Box::new(editor),
    ))
}

async fn show_ads(plugin: &AdPlugin, kind: AdKind, repeat: u32, interval: Duration) -> Result<()> {
    for call in 0..repeat {
        if call > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }

        let result = match kind {
            AdKind::FullScreen => match plugin.full_screen_ads() {
                Some(ads) => ads.show().await,
                None => {
                    warn!("Full screen ads are not supported by the current settings");
                    return Ok(());
                }
            },
            AdKind::Rewarded => match plugin.rewarded_ads() {
                Some(ads) => ads.show().await,
                None => {
                    warn!("Rewarded ads are not supported by the current settings");
                    return Ok(());
                }
            },
        };

        print_result(&result)?;
    }
    Ok(())
}

fn print_result(result: &ShowAdResult) -> Result<()> {
    let json = serde_json::to_string(result).context("Failed to serialize ad result")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        profile = ?config.profile,
        storage_dir = %config.storage_dir.display(),
        level = %config.log_level,
        "Starting adlad-dummy"
    );

    let settings = open_settings(&config);

    match cli.command {
        Command::List => {
            let catalog = settings.catalog();
            for descriptor in catalog.iter() {
                let value = settings.get_value(descriptor.id);
                println!("{}", edit::describe(descriptor, &value, settings.is_overridden(descriptor.id)));
            }
        }
        Command::Get { id } => {
            let id: SettingId = id.parse()?;
            println!("{}", settings.get_value(id));
        }
        Command::Set { id, value } => {
            let id: SettingId = id.parse()?;
            let value = edit::apply_input(&settings, id, &value)?;
            println!("{id} = {value}");
        }
        Command::Configure => {
            settings.open_editor(&mut EguiSurface::new());
        }
        Command::Show { kind, repeat, interval_ms } => {
            let plugin = build_plugin(&config, &settings)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("Failed to build async runtime")?;
            runtime.block_on(show_ads(&plugin, kind, repeat, Duration::from_millis(interval_ms)))?;
        }
        Command::Banner { id, width, height } => {
            let plugin = build_plugin(&config, &settings)?;
            match plugin.banner_ads() {
                Some(banners) => println!("{}", banners.show(&BannerSlot::new(id, width, height))),
                None => warn!("Banner ads are not supported by the current settings"),
            }
        }
    }

    Ok(())
}
