//! CLI entry point for paintyard

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paintyard::content::{ItemForm, ListName};

#[derive(Parser)]
#[command(name = "paintyard")]
#[command(version)]
#[command(about = "Manage the Paintyard site content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Print the content document or one field (e.g. colors.headerBg)
    Show {
        /// Dotted field path
        path: Option<String>,
    },

    /// Set a field (e.g. `set address "Kyiv, Main st. 1"`)
    Set {
        /// Dotted field path
        path: String,

        /// New value
        value: String,

        /// Parse the value as JSON instead of a plain string
        #[arg(long)]
        json: bool,
    },

    /// Replace the phone list, one number per argument
    Phones {
        phones: Vec<String>,
    },

    /// List brands or articles
    List {
        /// brands or articles
        #[arg(default_value = "brands")]
        list: ListName,
    },

    /// Add a new entry, or edit the entry given by --id
    Upsert {
        /// brands or articles
        list: ListName,

        #[command(flatten)]
        item: ItemArgs,
    },

    /// Remove an entry
    Remove {
        /// brands or articles
        list: ListName,

        /// Entry id
        id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the content as data.json
    Export {
        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Discard stored edits and fall back to data.json
    Reset,

    /// Serve the site and the admin API
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[derive(Args)]
struct ItemArgs {
    /// Id of the entry to edit
    #[arg(long)]
    id: Option<u64>,

    #[arg(long, default_value = "")]
    name: String,

    /// Brand description
    #[arg(long, default_value = "")]
    description: String,

    /// Image path or data URI
    #[arg(long, default_value = "")]
    image: String,

    /// Brand price
    #[arg(long)]
    price: Option<String>,

    /// Article excerpt
    #[arg(long, default_value = "")]
    excerpt: String,

    /// Article content (HTML)
    #[arg(long, default_value = "")]
    content: String,
}

impl From<ItemArgs> for ItemForm {
    fn from(args: ItemArgs) -> Self {
        ItemForm {
            id: args.id,
            name: args.name,
            description: args.description,
            image: args.image,
            price: args.price,
            excerpt: args.excerpt,
            content: args.content,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "paintyard=debug,info"
    } else {
        "paintyard=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing Paintyard site in {:?}", target_dir);
            paintyard::commands::init::init_site(&target_dir)?;
            println!("Initialized Paintyard site in {:?}", target_dir);
        }

        Commands::Show { path } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            paintyard::commands::show::run(&site, path.as_deref()).await?;
        }

        Commands::Set { path, value, json } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            let value = paintyard::commands::set::parse_value(&value, json)?;
            paintyard::commands::set::run(&site, &path, value).await?;
        }

        Commands::Phones { phones } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            paintyard::commands::set::phones(&site, &phones).await?;
        }

        Commands::List { list } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            paintyard::commands::list::run(&site, list).await?;
        }

        Commands::Upsert { list, item } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            let form = ItemForm::from(item);
            paintyard::commands::edit::save(&site, list, &form).await?;
        }

        Commands::Remove { list, id, yes } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            paintyard::commands::edit::remove(&site, list, id, yes).await?;
        }

        Commands::Export { output } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            paintyard::commands::export::run(&site, output.as_deref()).await?;
        }

        Commands::Reset => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            tracing::info!("Clearing stored content...");
            site.reset()?;
            println!("Reset successfully!");
        }

        Commands::Server { port, ip } => {
            let site = paintyard::Paintyard::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            paintyard::server::start(&site, &ip, port).await?;
        }

        Commands::Version => {
            println!("paintyard version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
