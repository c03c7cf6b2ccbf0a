use clap::{Parser, Subcommand, ValueEnum};
use dtc_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtc")]
#[command(
    version,
    about = "Design Token Crawler - Extract design tokens from rendered pages",
    long_about = "Design Token Crawler (DTC)\n\nReads a crawl result (JSON or YAML list of pages), captures each page's computed styles with a headless browser (or from saved snapshots via --styles-dir), and writes one token file per category to <output-dir>/raw/<category>-analysis.json.\n\nCategories: color, typography, spacing, border, animation."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with [browser], [output] and per-category options; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract design tokens from the pages of a crawl result
    Extract {
        #[arg(long, value_name = "FILE", help = "Crawl result file (.json, .yaml or .yml)")]
        crawl: PathBuf,

        #[arg(
            long,
            value_name = "DIR",
            help = "Read captured page styles from DIR instead of launching a browser"
        )]
        styles_dir: Option<PathBuf>,

        #[arg(
            long,
            value_name = "LIST",
            help = "Categories to extract (comma-separated: color,typography,spacing,border,animation); all when omitted"
        )]
        categories: Option<String>,

        #[arg(
            long,
            value_name = "N",
            help = "Minimum number of pages a value must appear on, applied to every category"
        )]
        min_occurrences: Option<usize>,

        #[arg(long, value_name = "DIR", help = "Directory for token files (default: output)")]
        output_dir: Option<PathBuf>,

        #[arg(
            long,
            default_value = "1440x900",
            help = "Viewport dimensions (WIDTHxHEIGHT)"
        )]
        viewport: Viewport,

        #[arg(long, default_value = "4", help = "Maximum pages captured concurrently")]
        max_concurrent: usize,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Summary output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
