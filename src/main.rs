//! pixseek CLI - image search and download command line interface.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use pixseek::{DownloadRequest, Downloader, ImageSearch};

/// pixseek - image search and acquisition CLI
#[derive(Parser)]
#[command(name = "pixseek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for images
    Search(SearchArgs),

    /// Download an image to a local path
    Download(DownloadArgs),
}

#[derive(Parser)]
struct SearchArgs {
    /// Search keywords (multiple words allowed)
    query: Vec<String>,

    /// Image category: icon, picture, background, portrait
    #[arg(short, long, default_value = "icon")]
    category: String,

    /// Maximum number of hits to display
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser)]
struct DownloadArgs {
    /// URL of the image to download
    url: String,

    /// Local path to save the image (e.g. images/my_image.png)
    path: PathBuf,

    /// Image width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Image color (e.g. #FF0000)
    #[arg(short, long)]
    color: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Download(args) => run_download(args).await,
    }
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let query = args.query.join(" ");
    if query.trim().is_empty() {
        anyhow::bail!("Query must not be empty");
    }

    let search = ImageSearch::new();
    let result = search.search(&args.category, &query).await;

    match args.format {
        OutputFormat::Text => {
            if !result.success {
                eprintln!("Search failed: {}", result.error);
                std::process::exit(1);
            }

            println!(
                "\nSearch results for \"{}\" ({} hits in {}ms):\n",
                query,
                result.images.len(),
                result.query_time
            );
            for (i, hit) in result.images.iter().take(args.limit).enumerate() {
                println!("{}. {}", i + 1, hit.url);
                println!("   {}x{} | tags: {}", hit.width, hit.height, hit.prompt.join(", "));
                println!();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

async fn run_download(args: DownloadArgs) -> Result<()> {
    let mut request = DownloadRequest::new(args.url, args.path);
    request.width = args.width;
    request.height = args.height;
    request.color = args.color;

    let downloader = Downloader::new();
    let result = downloader.download(&request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}
