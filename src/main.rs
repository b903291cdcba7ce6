use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wikilens::{
    ContentCache, ExcerptFetcher, Registry, Settings, SettingsLoader, Target, TargetResolver,
    detect_system_language,
};

#[derive(Parser)]
#[command(name = "wikilens")]
#[command(
    version,
    about = "Resolve in-game objects to the right wiki page, with cached excerpt previews"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Settings file (default: merged config chain)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Wiki registry file (default: built-in registry)")]
    registry: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a target to its wiki page URL
    Resolve {
        /// Namespace of the target, e.g. "item" or "block"
        namespace: String,
        /// Identifier within the namespace, e.g. "oak_log"
        identifier: String,
    },

    /// Resolve a random page for a namespace ("I'm feeling lucky")
    Random {
        /// Namespace to pick the wiki for
        namespace: String,
    },

    /// Resolve a target and print its excerpt preview
    Excerpt {
        namespace: String,
        identifier: String,
        #[arg(long, help = "Also download the thumbnail into the cache")]
        thumbnail: bool,
    },

    /// List every language tag available across active wiki families
    Languages,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match &cli.config {
        Some(path) => SettingsLoader::load_from_file(path)?,
        None => SettingsLoader::load()?,
    };

    let registry_path = cli.registry.as_ref().or(settings.registry_path.as_ref());
    let registry = match registry_path {
        Some(path) => Registry::load_from_path(path)?,
        None => Registry::builtin()?,
    };

    let resolver = TargetResolver::new(&registry, &settings, detect_system_language());

    match cli.command {
        Commands::Resolve {
            namespace,
            identifier,
        } => {
            let target = Target::new(namespace, identifier);
            match resolver.resolve(&target) {
                Some(page) => println!("{}", page.url),
                None => anyhow::bail!("no wiki claims namespace '{}'", target.namespace),
            }
        }
        Commands::Random { namespace } => match resolver.random_page(&namespace) {
            Some(page) => println!("{}", page.url),
            None => anyhow::bail!("no wiki claims namespace '{namespace}'"),
        },
        Commands::Excerpt {
            namespace,
            identifier,
            thumbnail,
        } => {
            let target = Target::new(namespace, identifier);
            let Some(page) = resolver.resolve(&target) else {
                anyhow::bail!("no wiki claims namespace '{}'", target.namespace);
            };

            let rt = Runtime::new()?;
            rt.block_on(print_excerpt(&settings, page, thumbnail))?;
        }
        Commands::Languages => {
            for tag in registry.all_available_languages(&settings) {
                println!("{tag}");
            }
        }
    }

    Ok(())
}

async fn print_excerpt(
    settings: &Settings,
    page: wikilens::WikiPage,
    thumbnail: bool,
) -> anyhow::Result<()> {
    let cache = Arc::new(ContentCache::new(SettingsLoader::cache_dir(settings))?);
    let fetcher = ExcerptFetcher::new(Arc::clone(&cache));

    println!("{}", page.url);
    match fetcher.fetch_excerpt(&page).wait().await {
        Some(Ok(excerpt)) => {
            println!("\n{}", excerpt.title);
            println!("{}", excerpt.excerpt);
            if let Some(image) = &excerpt.image {
                println!("\nimage: {} ({}x{})", image.url, image.width, image.height);
                if thumbnail {
                    match cache.fetch(&image.url).wait().await {
                        Some(Ok(bytes)) => {
                            println!("thumbnail cached: {} bytes", bytes.len());
                        }
                        Some(Err(e)) => eprintln!("thumbnail fetch failed: {e}"),
                        None => eprintln!("thumbnail fetch abandoned"),
                    }
                }
            }
        }
        // The page URL above stays usable either way.
        Some(Err(e)) => eprintln!("no excerpt available: {e}"),
        None => eprintln!("excerpt fetch abandoned"),
    }

    Ok(())
}
