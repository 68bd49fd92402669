mod display;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bidclaim_core::{AppConfig, Identity, PageInfo};
use bidclaim_host::{IdentityBridge, ProfileStore, StaticProfile};
use bidclaim_store::ClaimStore;
use bidclaim_view::{ClaimChecker, ClaimError, ClaimForm, DashboardView, FormStatus};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bidclaim", author, version, about = "Claim marketplace jobs for your team")]
struct Cli {
    /// Config file (TOML).
    #[arg(long, global = true, env = "BIDCLAIM_CONFIG")]
    config: Option<PathBuf>,

    /// Display-name storage file.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show whether the job at URL is already claimed.
    Check {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Check the job at URL and claim it if it is free.
    Claim {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Claim the job at URL under a typed name, remembering the name.
    Save {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Defaults to the remembered name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Remember the display name used for claims.
    SetName { name: String },
    /// Show the signed-in identity and remembered name.
    Whoami,
    /// List recent claims, newest first.
    Dashboard {
        /// Extra pages to reveal after the first.
        #[arg(long, default_value_t = 0)]
        more: usize,
    },
    /// Delete one of your claims made today.
    Delete {
        doc_id: String,
        /// Must be the word "delete".
        #[arg(long)]
        confirm: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("bidclaim v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let profile = open_profile(cli.profile.as_deref())?;

    // Commands that never touch the store.
    match &cli.command {
        Command::SetName { name } => {
            let name = name.trim();
            if name.is_empty() {
                display::print_error("Please enter your name first.");
                return Ok(());
            }
            profile
                .set_display_name(name)
                .context("saving display name")?;
            println!("Display name set to {name}");
            return Ok(());
        }
        Command::Whoami => {
            let config = load_config(cli.config.as_deref())?;
            let bridge = spawn_bridge(&config);
            let identity = bridge.current_identity().await.ok();
            let name = profile.display_name().context("reading display name")?;
            display::print_whoami(identity.as_ref(), name.as_deref());
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(cli.config.as_deref())?;
    let store: Arc<dyn ClaimStore> = bidclaim_sync::connect(&config.store, &config.http)
        .with_context(|| format!("connecting to {} store", config.store.backend_name()))?;
    let bridge = spawn_bridge(&config);

    match cli.command {
        Command::Check { url, title } => {
            let mut checker = ClaimChecker::new(store, PageInfo::new(url, title));
            checker.check().await;
            display::print_checker(&checker);
        }
        Command::Claim { url, title } => {
            let mut checker = ClaimChecker::new(store, PageInfo::new(url, title));
            checker.check().await;
            if checker.state().can_claim() {
                let name = profile.display_name().context("reading display name")?;
                let identity = bridge.current_identity().await.ok();
                if let Some(notice) = checker.claim(name.as_deref(), identity.as_ref()).await {
                    display::print_notice(&notice);
                }
            }
            display::print_checker(&checker);
        }
        Command::Save { url, title, name } => {
            let form = ClaimForm::new(
                store,
                &profile,
                PageInfo::new(url, title),
                config.marketplace.host.as_str(),
            );
            if form.status() == FormStatus::NotAJobPage {
                display::print_error("Not a job page. Open a job posting first.");
                return Ok(());
            }
            let name = match name {
                Some(name) => name,
                None => form
                    .remembered_name()
                    .context("reading display name")?
                    .unwrap_or_default(),
            };
            let identity = bridge.current_identity().await.ok();
            match form.save(&name, identity.as_ref()).await {
                Ok(outcome) => display::print_save_outcome(&outcome),
                Err(ClaimError::Validation(msg)) => display::print_error(&msg),
                Err(err) => return Err(err).context("saving claim"),
            }
        }
        Command::Dashboard { more } => {
            let mut view =
                DashboardView::open(store, &bridge, config.marketplace.job_url_base.as_str())
                    .await;
            for _ in 0..more {
                if !view.load_more() {
                    break;
                }
            }
            display::print_dashboard(&view, &Local::now());
        }
        Command::Delete { doc_id, confirm } => {
            let mut view =
                DashboardView::open(store, &bridge, config.marketplace.job_url_base.as_str())
                    .await;
            if let Some(msg) = view.status().message() {
                display::print_error(msg);
                return Ok(());
            }
            let title = match view.request_delete(&doc_id, &Local::now()) {
                Ok(pending) => pending.title.clone(),
                Err(err) => {
                    display::print_error(&err.to_string());
                    return Ok(());
                }
            };
            if !view.set_confirmation(&confirm) {
                display::print_error(&format!(
                    "Type \"{}\" to delete \"{}\".",
                    bidclaim_view::CONFIRM_WORD,
                    display::or_no_title(&title)
                ));
                return Ok(());
            }
            match view.confirm_delete().await {
                Ok(()) => println!("Deleted {doc_id}"),
                Err(err) => display::print_error(&err.to_string()),
            }
        }
        Command::SetName { .. } | Command::Whoami => {}
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => dirs::config_dir()
            .context("no configuration directory; pass --config")?
            .join("bidclaim")
            .join("config.toml"),
    };
    AppConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

fn open_profile(path: Option<&std::path::Path>) -> anyhow::Result<ProfileStore> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => ProfileStore::default_path().context("locating display-name storage")?,
    };
    Ok(ProfileStore::open(path))
}

fn spawn_bridge(config: &AppConfig) -> IdentityBridge {
    let identity = config.identity.clone().map(Identity::from);
    IdentityBridge::spawn(StaticProfile(identity))
}
