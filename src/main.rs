use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use cookbook_corpus::books::{BookSplitter, FileCache, StrategyChoice};
use cookbook_corpus::splitters::{preferred_strategy, StrategyRegistry};
use cookbook_corpus::{load_config, BookFetcher, DatasetExport, NewSource, Provider, Store};

#[derive(Parser)]
#[command(name = "cookbook-corpus", version, about = "Split historical cookbooks and export a recipe dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered split strategies
    Strategies {
        /// Only this provider (gutenberg or internet_archive)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Register a book source
    AddSource {
        /// Identifier at the provider (Gutenberg ebook number, Internet Archive item)
        external_id: String,
        #[arg(short, long)]
        provider: String,
        #[arg(short, long)]
        title: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Split strategy stored on the source
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(long)]
        region: Option<String>,
    },
    /// Download a registered book into the cache
    Fetch { external_id: String },
    /// Split a cached book into recipe chunks
    Split {
        external_id: String,
        /// Override the stored strategy
        #[arg(short, long)]
        strategy: Option<String>,
        /// Store the chunks as pending recipes
        #[arg(long)]
        save: bool,
        /// Print the chunks as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Write the dataset artifacts (values default to the configuration)
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        cap: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_failed: Option<u32>,
        #[arg(long)]
        min_ingredients: Option<u32>,
        #[arg(long)]
        min_steps: Option<u32>,
        #[arg(long)]
        min_chars: Option<u64>,
        #[arg(long)]
        max_chars: Option<u64>,
        /// Dataset version tag
        #[arg(long)]
        version_tag: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command {
        Commands::Strategies { provider } => {
            let providers = match provider {
                Some(name) => vec![name.parse::<Provider>()?],
                None => Provider::ALL.to_vec(),
            };
            for provider in providers {
                let registry = StrategyRegistry::builtin(provider);
                println!("{}:", provider);
                for name in registry.list() {
                    let marker = if name == preferred_strategy(provider) { " (default)" } else { "" };
                    println!("  {}{}", name, marker);
                }
            }
        }
        Commands::AddSource {
            external_id,
            provider,
            title,
            author,
            year,
            strategy,
            region,
        } => {
            let provider: Provider = provider.parse()?;
            if let Some(name) = strategy.as_deref() {
                StrategyRegistry::builtin(provider).get(name)?;
            }
            let store = Store::open(&config.database)?;
            let mut source = NewSource::new(title, provider, external_id);
            source.author = author;
            source.publication_year = year;
            source.split_strategy = strategy;
            source.region = region;
            let id = store.insert_source(&source)?;
            println!("Added source #{}", id);
        }
        Commands::Fetch { external_id } => {
            let store = Store::open(&config.database)?;
            let source = store.find_source(&external_id)?;
            let fetcher = BookFetcher::new(&config.fetch)?;
            let path = fetcher.fetch_into(&source, &FileCache::new(&config.cache_dir))?;
            println!("Cached {}", path.display());
        }
        Commands::Split {
            external_id,
            strategy,
            save,
            json,
        } => {
            let mut store = Store::open(&config.database)?;
            let source = store.find_source(&external_id)?;
            let splitter = BookSplitter::new(FileCache::new(&config.cache_dir));
            let choice = match strategy.as_deref() {
                Some(name) => StrategyChoice::Named(name),
                None => StrategyChoice::Preferred,
            };
            let chunks = splitter.split(&source, choice)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else {
                for chunk in &chunks {
                    println!(
                        "{:>5}  {:<30}  {}",
                        chunk.page_number.map(|p| p.to_string()).unwrap_or_default(),
                        chunk.section_header.as_deref().unwrap_or(""),
                        chunk.title()
                    );
                }
                println!("{} chunks", chunks.len());
            }
            if save {
                let saved = store.save_chunks(source.id, &chunks)?;
                info!("Stored {} pending recipes for {}", saved, external_id);
            }
        }
        Commands::Export {
            out,
            cap,
            seed,
            max_failed,
            min_ingredients,
            min_steps,
            min_chars,
            max_chars,
            version_tag,
        } => {
            let mut settings = config.export.clone();
            if let Some(out) = out {
                settings.output_dir = out;
            }
            settings.cap_per_source = cap.unwrap_or(settings.cap_per_source);
            settings.seed = seed.unwrap_or(settings.seed);
            settings.max_failed = max_failed.unwrap_or(settings.max_failed);
            settings.min_ingredients = min_ingredients.unwrap_or(settings.min_ingredients);
            settings.min_steps = min_steps.unwrap_or(settings.min_steps);
            settings.min_chars = min_chars.unwrap_or(settings.min_chars);
            settings.max_chars = max_chars.unwrap_or(settings.max_chars);
            if let Some(version) = version_tag {
                settings.dataset_version = version;
            }

            let builder = DatasetExport::builder().config(settings);
            // validate before touching the database
            builder.scope()?;
            let out_dir = builder.settings().output_dir.clone();
            let store = Store::open(&config.database)?;
            let manifest = builder.build(store.connection())?;
            println!(
                "Exported {} recipes, {} ingredient rows, {} distinct tokens to {}",
                manifest.totals.recipes,
                manifest.totals.ingredient_rows,
                manifest.totals.vocabulary,
                out_dir.display()
            );
        }
    }

    Ok(())
}
