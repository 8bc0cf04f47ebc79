use clap::{Parser, Subcommand};
use club_site::content::{AppContext, ContentManager};
use club_site::dom::PageDocument;
use club_site::gallery::ImageProbe;
use club_site::notifications::{NoSignal, NotificationManager, SystemClock};
use club_site::routing::PageKind;
use club_site::source::DirSource;
use club_site::store::{FileStore, LocalStore, ThemePreference};
use club_site::types::{NotificationKind, NotificationLink};
use club_site::{config, generate, output};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Crate version on a release tag, `dev@<commit>` otherwise.
fn version_string() -> &'static str {
    if env!("CLUB_SITE_RELEASE") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("CLUB_SITE_COMMIT") {
        "" => "dev@unknown",
        // Leaked once; clap asks for the version a single time.
        commit => Box::leak(format!("dev@{commit}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "club-site")]
#[command(about = "Static site generator for a college technical club")]
#[command(long_about = "\
Static site generator for a college technical club

Content lives in JSON documents under the site directory. Every page is
rendered the way the browser site renders it on load: resources are fetched,
filtered and sorted, and painted into the page's containers.

Site structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── assets/                      # Images and other files → copied to output
  └── data/
      ├── events.json              # Events; featured ones go on the home timeline
      ├── workshops.json           # Workshops; featured ones go on the home page
      ├── members.json             # Batches, members and quotes
      ├── gallery.json             # Gallery items (first 3 on the home page)
      ├── featured.json            # Banners for the home page carousel
      ├── about.json               # About section
      └── notifications.json       # Seed notifications

Local state (theme, notification read state, last check) is kept in the
store file named by [site] storage in config.toml.

Run 'club-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page into the output directory
    Build,
    /// Load all content and report what it holds, without writing pages
    Check,
    /// Manage notifications
    #[command(subcommand)]
    Notify(NotifyCommand),
    /// Read or change the saved color theme
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum NotifyCommand {
    /// Add a notification at the top of the list
    Add {
        title: String,
        message: String,
        /// workshop, event, announcement or info
        #[arg(long, default_value = "announcement")]
        kind: NotificationKind,
        /// Link target shown after the message
        #[arg(long)]
        link: Option<String>,
        /// Icon class list; defaults to the kind's icon
        #[arg(long)]
        icon: Option<String>,
    },
    /// List notifications, newest first
    List,
    /// Mark one notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
    /// Remove every notification
    Clear,
    /// Record that notifications were seen now
    Check,
    /// Show counts and whether anything is new
    Status,
}

#[derive(Subcommand)]
enum ThemeCommand {
    /// Print the saved theme
    Get,
    /// Save a theme (light or dark)
    Set { theme: ThemePreference },
    /// Switch to the other theme
    Toggle,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let ctx = AppContext::for_site(&cli.source, site_config);
            let summary = generate::generate(&ctx, &cli.source, &cli.output)?;
            output::print_build_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", cli.source.display());
            let ctx = AppContext::for_site(&cli.source, site_config);
            let probe = ctx.probe.clone();
            let mut manager = ContentManager::new(ctx);
            let mut doc = PageDocument::for_page(PageKind::Home);
            let outcome = manager.init(&mut doc);
            let Some(report) = outcome.report() else {
                return Err("content was already initialized".into());
            };

            let missing: Vec<String> = manager
                .gallery()
                .items()
                .unwrap_or_default()
                .iter()
                .filter_map(|item| item.image.as_deref())
                .filter(|image| !probe.exists(image))
                .map(str::to_string)
                .collect();
            output::print_check_output(&manager, report, &missing);

            let failed_core: Vec<&str> = report
                .failed
                .iter()
                .filter(|r| r.is_core())
                .map(|r| r.as_str())
                .collect();
            if !failed_core.is_empty() {
                return Err(format!("failed to load: {}", failed_core.join(", ")).into());
            }
            println!("==> Content is valid");
        }
        Command::Notify(command) => {
            let site_config = config::load_config(&cli.source)?;
            let store = site_store(&cli.source, &site_config);
            let mut manager =
                NotificationManager::new(store, Arc::new(SystemClock), Arc::new(NoSignal));
            manager.load(&DirSource::new(&cli.source));
            run_notify(command, &mut manager)?;
        }
        Command::Theme(command) => {
            let site_config = config::load_config(&cli.source)?;
            let store = site_store(&cli.source, &site_config);
            let theme = match command {
                ThemeCommand::Get => ThemePreference::load(store.as_ref())?,
                ThemeCommand::Set { theme } => {
                    theme.save(store.as_ref())?;
                    theme
                }
                ThemeCommand::Toggle => ThemePreference::toggle(store.as_ref())?,
            };
            println!("{}", theme);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_notify(
    command: NotifyCommand,
    manager: &mut NotificationManager,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        NotifyCommand::Add {
            title,
            message,
            kind,
            link,
            icon,
        } => {
            let link = link.map(|href| NotificationLink {
                href,
                label: kind.link_label().to_string(),
            });
            let added = manager.add_notification(&title, &message, kind, icon.as_deref(), link)?;
            println!("Added {}", added.id);
        }
        NotifyCommand::List => {
            let now = chrono::Utc::now();
            output::print_notification_list(&manager.sorted_notifications(), now);
        }
        NotifyCommand::Read { id } => {
            if !manager.mark_as_read(&id)? {
                return Err(format!("no notification with id {id}").into());
            }
            println!("Marked {id} as read");
        }
        NotifyCommand::ReadAll => {
            let changed = manager.mark_all_as_read()?;
            println!("Marked {changed} as read");
        }
        NotifyCommand::Clear => {
            manager.clear_all()?;
            println!("Cleared all notifications");
        }
        NotifyCommand::Check => {
            manager.mark_as_checked()?;
            output::print_notification_status(manager);
        }
        NotifyCommand::Status => {
            output::print_notification_status(manager);
        }
    }
    Ok(())
}

/// The local store named by `[site] storage`, relative to the site root.
fn site_store(source: &Path, site_config: &config::SiteConfig) -> Arc<dyn LocalStore> {
    Arc::new(FileStore::new(source.join(&site_config.site.storage)))
}

/// Log to stderr so command output stays clean on stdout.
fn init_tracing(verbose: bool) {
    let default = if verbose { "club_site=debug,info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
