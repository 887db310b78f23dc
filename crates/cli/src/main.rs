mod booking;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use charter_core::BookingDraft;
use charter_desk::{BookingDesk, DeskError, DeskSettings, LinkOpener, DEFAULT_ASSETS_ROOT};
use charter_observability::{init_tracing, DeskMetrics};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "charter")]
#[command(about = "Yacht and helicopter charter booking desk")]
struct Cli {
    #[arg(long, env = "CHARTER_ASSETS_ROOT", default_value = DEFAULT_ASSETS_ROOT)]
    assets_root: PathBuf,

    /// Tagged vessel manifest; replaces the asset directory scan.
    #[arg(long, env = "CHARTER_MANIFEST")]
    manifest: Option<PathBuf>,

    #[arg(long = "config", env = "CHARTER_CONFIG_FILE")]
    config_file: Option<PathBuf>,

    #[arg(long, env = "CHARTER_DEEP_LINK_BASE")]
    deep_link_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every vessel in the catalog.
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Show one vessel with its profile and gallery.
    Vessel { id: String },
    /// Charter packages and helicopter services.
    Prices {
        #[arg(long)]
        tier: Option<String>,
    },
    /// Walk through the booking wizard.
    Book {
        #[arg(long)]
        vessel: Option<String>,
    },
    /// Validate a saved draft and print its message and link.
    Quote {
        #[arg(long)]
        draft: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct CatalogRow<'a> {
    id: &'a str,
    name: &'a str,
    kind: &'a str,
    thumbnail: &'a str,
    exterior: usize,
    interior: usize,
}

/// Prints the link; the terminal has no browser to hand it to.
struct PrintOpener;

impl LinkOpener for PrintOpener {
    fn open(&self, link: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\nOpen this link to send the request:\n{link}")
    }
}

fn main() -> Result<()> {
    init_tracing("charter_cli");
    let cli = Cli::parse();

    let settings = DeskSettings {
        assets_root: cli.assets_root,
        manifest: cli.manifest,
        config_file: cli.config_file,
        deep_link_base: cli.deep_link_base,
    };
    let desk = BookingDesk::from_settings(&settings, DeskMetrics::shared())?;

    match cli.command {
        Command::Catalog { json } => print_catalog(&desk, json)?,
        Command::Vessel { id } => {
            let vessel = desk
                .catalog()
                .find(&id)
                .with_context(|| format!("no vessel with id `{id}`"))?;
            let profile = desk.config().profile_for(&vessel.id);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "vessel": vessel,
                    "profile": profile,
                    "gallery": vessel.gallery().collect::<Vec<_>>(),
                }))?
            );
        }
        Command::Prices { tier } => print_prices(&desk, tier.as_deref())?,
        Command::Book { vessel } => {
            let mut session = desk.start_session(vessel.as_deref());
            let stdin = io::stdin();
            let dispatch =
                booking::run_booking(&mut session, &PrintOpener, stdin.lock(), io::stdout())?;
            if dispatch.is_none() {
                println!("Booking cancelled.");
            }
        }
        Command::Quote { draft } => {
            let raw = std::fs::read_to_string(&draft)
                .with_context(|| format!("failed reading draft {}", draft.display()))?;
            let parsed: BookingDraft = serde_json::from_str(&raw)
                .with_context(|| format!("invalid draft {}", draft.display()))?;

            match desk.dispatch_draft(&parsed, &PrintOpener) {
                Ok(dispatch) => println!("\n{}", dispatch.message),
                Err(DeskError::Submit(charter_core::SubmitError::Invalid(errors))) => {
                    for error in errors.iter() {
                        eprintln!("- {error}");
                    }
                    bail!("draft is not ready to send");
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    Ok(())
}

fn print_catalog(desk: &BookingDesk, json: bool) -> Result<()> {
    let rows = desk
        .catalog()
        .vessels()
        .iter()
        .map(|vessel| CatalogRow {
            id: &vessel.id,
            name: &vessel.name,
            kind: vessel.kind.as_code(),
            thumbnail: &vessel.thumbnail,
            exterior: vessel.exterior.len(),
            interior: vessel.interior.len(),
        })
        .collect::<Vec<_>>();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!(
            "{:<20} {:<28} {:<10} {} exterior / {} interior",
            row.id, row.name, row.kind, row.exterior, row.interior
        );
    }
    println!("{} vessel(s)", rows.len());
    Ok(())
}

fn print_prices(desk: &BookingDesk, tier: Option<&str>) -> Result<()> {
    let charters = &desk.config().charters;
    let tiers = match tier {
        Some(tier) if !charters.has_tier(tier) => bail!("`{tier}` is not a charter tier"),
        Some(tier) => vec![tier],
        None => charters.tiers(),
    };

    for tier in tiers {
        println!("{tier}");
        for prices in charters.prices_for_tier(tier) {
            for option in prices.options {
                println!("  {} - {}: {}", prices.location, option.duration, option.price);
            }
        }
    }

    if tier.is_none() {
        println!("Helicopter services");
        for listing in desk.config().helicopter.listings() {
            println!("  {}", listing.label);
        }
    }
    Ok(())
}
