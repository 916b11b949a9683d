use clap::{Parser, Subcommand};
use std::path::PathBuf;
use yield_images::Harvester;

#[derive(Parser, Debug)]
#[command(name = "yield-images")]
#[command(about = "Discover the images on a web page and download them as a zip archive")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of concurrent image requests
    #[arg(short, long, global = true)]
    pub concurrency: Option<usize>,

    /// Timeout for each request in seconds
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    /// Deadline for a whole archive download in seconds
    #[arg(long, global = true)]
    pub batch_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the images referenced by a page
    Discover {
        /// Page to scan for images
        page_url: String,

        /// Print a JSON document instead of one URL per line
        #[arg(long)]
        json: bool,
    },

    /// Download a single image
    Fetch {
        /// Absolute image URL
        image_url: String,

        /// Output file (defaults to the name derived from the URL)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download several images into a zip archive
    Archive {
        /// Absolute image URLs
        #[arg(required_unless_present = "from_page")]
        urls: Vec<String>,

        /// Also include every image discovered on this page
        #[arg(long)]
        from_page: Option<String>,

        /// Output file (defaults to the configured archive name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Build a Harvester from the config file and command-line overrides
pub fn build_harvester(args: &Args) -> yield_images::Result<Harvester> {
    let mut harvester = Harvester::new();

    if let Some(path) = &args.config {
        harvester = harvester.with_config_file(path)?;
    }
    if let Some(concurrency) = args.concurrency {
        harvester = harvester.with_max_concurrency(concurrency);
    }
    if let Some(timeout) = args.request_timeout {
        harvester = harvester.with_request_timeout(timeout);
    }
    if let Some(timeout) = args.batch_timeout {
        harvester = harvester.with_batch_timeout(timeout);
    }

    Ok(harvester)
}
