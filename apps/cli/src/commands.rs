//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::info;

use sitegraph_core::{
    PageType, RenderedPage, render_page, render_route, render_site, robots_txt, sitemap_entries,
    sitemap_xml, to_json_value, web_manifest,
};
use sitegraph_shared::{AppConfig, BusinessProfile, init_config, load_config, load_profile};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SiteGraph: page metadata and schema.org graphs from a business profile.
#[derive(Parser)]
#[command(
    name = "sitegraph",
    version,
    about = "Render page metadata, JSON-LD graphs and crawler files from a business profile.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Business profile TOML (overrides `defaults.profile_path`).
    #[arg(long, env = "SITEGRAPH_PROFILE", global = true)]
    pub profile: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the rendered `<head>` fragment of a page.
    Head {
        /// Route path (`/systems/docu-brain`) or page key (`system:docu-brain`).
        page: String,
    },

    /// Print the JSON-LD records of a page.
    Graph {
        /// Route path or page key.
        page: String,
    },

    /// Print the composed metadata of a page as JSON.
    Meta {
        /// Route path or page key.
        page: String,
    },

    /// Print the sitemap.
    Sitemap {
        /// Emit JSON entries instead of sitemap.xml.
        #[arg(long)]
        json: bool,

        /// Generation timestamp (RFC 3339). Defaults to now.
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Print robots.txt.
    Robots,

    /// Print the web-app manifest.
    Manifest,

    /// Render every known page and report what each one emits.
    Check,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so command
/// output on stdout stays pipeable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitegraph=warn",
        1 => "sitegraph=info",
        2 => "sitegraph=debug",
        _ => "sitegraph=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Settings resolved from CLI flags over the config file over defaults.
struct Settings {
    config: AppConfig,
    profile_path: PathBuf,
    pretty: bool,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self> {
        let config = load_config()?;
        let profile_path = cli
            .profile
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.defaults.profile_path));
        let pretty = cli.pretty || config.defaults.pretty;
        Ok(Self {
            config,
            profile_path,
            pretty,
        })
    }

    fn profile(&self) -> Result<BusinessProfile> {
        load_profile(&self.profile_path).wrap_err("could not load the business profile")
    }
}

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    if let Command::Config { action } = &cli.command {
        return match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        };
    }

    let settings = Settings::resolve(&cli)?;
    let profile = settings.profile()?;

    match cli.command {
        Command::Head { page } => cmd_head(&profile, &page),
        Command::Graph { page } => cmd_graph(&profile, &page, settings.pretty),
        Command::Meta { page } => cmd_meta(&profile, &page, settings.pretty),
        Command::Sitemap { json, at } => cmd_sitemap(&profile, &settings, json, at),
        Command::Robots => {
            print!("{}", robots_txt(&profile));
            Ok(())
        }
        Command::Manifest => print_json(&web_manifest(&profile), settings.pretty),
        Command::Check => cmd_check(&profile),
        Command::Config { .. } => Ok(()),
    }
}

/// Render a route path, or a page key for pages that need not exist.
fn render_target(profile: &BusinessProfile, target: &str) -> Result<RenderedPage> {
    let rendered = if target.starts_with('/') {
        render_route(profile, target)?
    } else {
        let page: PageType = target.parse()?;
        render_page(profile, &page)?
    };
    Ok(rendered)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_head(profile: &BusinessProfile, target: &str) -> Result<()> {
    let rendered = render_target(profile, target)?;
    print!("{}", rendered.head);
    info!(page = %rendered.page, etag = %rendered.etag, "printed head");
    Ok(())
}

fn cmd_graph(profile: &BusinessProfile, target: &str, pretty: bool) -> Result<()> {
    let rendered = render_target(profile, target)?;
    let documents = rendered
        .entities
        .iter()
        .map(to_json_value)
        .collect::<sitegraph_shared::Result<Vec<_>>>()?;
    print_json(&documents, pretty)
}

fn cmd_meta(profile: &BusinessProfile, target: &str, pretty: bool) -> Result<()> {
    let rendered = render_target(profile, target)?;
    print_json(&rendered.metadata, pretty)
}

fn cmd_sitemap(
    profile: &BusinessProfile,
    settings: &Settings,
    json: bool,
    at: Option<DateTime<Utc>>,
) -> Result<()> {
    let generated_at = at.unwrap_or_else(Utc::now);
    let entries = sitemap_entries(profile, generated_at, &settings.config.sitemap);
    if json {
        print_json(&entries, settings.pretty)
    } else {
        print!("{}", sitemap_xml(&entries));
        Ok(())
    }
}

fn cmd_check(profile: &BusinessProfile) -> Result<()> {
    let pages = render_site(profile)?;

    println!();
    println!("  {:<48} {:>8}  {:<8}  INDEX", "PAGE", "RECORDS", "ETAG");
    println!("  {}", "-".repeat(76));
    let mut records = 0;
    for rendered in &pages {
        records += rendered.entities.len();
        println!(
            "  {:<48} {:>8}  {:<8}  {}",
            rendered.metadata.canonical_url,
            rendered.entities.len(),
            &rendered.etag[..8],
            if rendered.metadata.robots.index() { "yes" } else { "no" },
        );
    }
    println!();
    println!("  {} pages, {records} records", pages.len());
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sitegraph").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    fn fixture() -> BusinessProfile {
        load_profile(std::path::Path::new("../../fixtures/profile.toml")).expect("fixture")
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = parse(&["head", "/about", "--profile", "p.toml", "-vv", "--log-format", "json"]);
        assert_eq!(cli.profile, Some(PathBuf::from("p.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert!(matches!(cli.command, Command::Head { ref page } if page == "/about"));
    }

    #[test]
    fn sitemap_accepts_timestamp() {
        let cli = parse(&["sitemap", "--json", "--at", "2026-01-01T00:00:00Z"]);
        let Command::Sitemap { json, at } = cli.command else {
            panic!("expected sitemap command");
        };
        assert!(json);
        assert_eq!(at.unwrap().to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn targets_accept_paths_and_page_keys() {
        let profile = fixture();
        let by_path = render_target(&profile, "/systems/docu-brain").unwrap();
        let by_key = render_target(&profile, "system:docu-brain").unwrap();
        assert_eq!(by_path.head, by_key.head);

        // Page keys may name missing records; paths may not.
        assert!(render_target(&profile, "project:ghost").is_ok());
        assert!(render_target(&profile, "/projects/ghost").is_err());
        assert!(render_target(&profile, "blog").is_err());
    }
}
