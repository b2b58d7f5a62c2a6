mod tree_print;

use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use thiserror::Error;

use sab_contents_backend::assets::LocalFs;
use sab_contents_backend::config::ScriptureConfig;
use sab_contents_backend::convert::{convert_contents, load_contents, ConvertOptions};
use sab_contents_backend::logger::{self, Level};
use sab_contents_backend::tree_builder::check_links;

#[derive(Error, Debug)]
enum CliError {
    #[error("Data directory does not exist or is not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("{0} link issue(s) found")]
    LinkIssues(usize),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert Scripture App Builder contents.xml into a typed contents tree", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Export directory containing contents.xml and the contents/ asset folder.
    /// If not provided, the SAB_DATA_DIR environment variable will be used.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "SAB_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Print log messages to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert contents.xml to JSON and copy its assets
    Convert {
        /// Destination directory for assets and contents.json
        #[arg(long, value_name = "DIRECTORY_PATH", env = "SAB_DEST_DIR")]
        dest_dir: PathBuf,

        /// Write the JSON here instead of DEST_DIR/contents.json
        #[arg(long, value_name = "FILE_PATH")]
        output: Option<PathBuf>,

        /// Scripture config JSON used to check reference links
        #[arg(long, value_name = "FILE_PATH")]
        config: Option<PathBuf>,

        /// Don't copy the contents/ assets
        #[arg(long, default_value_t = false)]
        no_copy: bool,
    },

    /// Print the resolved contents tree
    Tree {
        /// Scripture config JSON passed to link extraction
        #[arg(long, value_name = "FILE_PATH")]
        config: Option<PathBuf>,

        /// Resolve audio against this destination directory, as `convert` would
        #[arg(long, value_name = "DIRECTORY_PATH", env = "SAB_DEST_DIR")]
        dest_dir: Option<PathBuf>,
    },

    /// Report links whose target does not fit their type
    CheckLinks {
        /// Scripture config JSON used to check reference links
        #[arg(long, value_name = "FILE_PATH")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<Option<ScriptureConfig>> {
    match path {
        Some(p) => {
            let config = ScriptureConfig::load(p)
                .with_context(|| format!("Failed to load scripture config {:?}", p))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

fn convert(data_dir: &Path, dest_dir: PathBuf, output: Option<PathBuf>, config: Option<&Path>, no_copy: bool) -> Result<()> {
    let opts = ConvertOptions {
        data_dir: data_dir.to_path_buf(),
        dest_dir,
        output,
        config: load_config(config)?,
        copy_assets: !no_copy,
    };

    let stats = convert_contents(&opts).context("Conversion failed")?;

    println!("items: {}", stats.items);
    println!("screens: {}", stats.screens);
    println!("assets copied: {}", stats.assets_copied);
    println!("link issues: {}", stats.link_issues.len());
    println!("written: {}", stats.output.display());

    Ok(())
}

fn print_tree(data_dir: &Path, dest_dir: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let data = load_contents(data_dir, dest_dir, &LocalFs, config.as_ref())
        .with_context(|| format!("Failed to read contents from {:?}", data_dir))?;

    print!("{}", tree_print::render_tree(&data));
    Ok(())
}

fn report_links(data_dir: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let data = load_contents(data_dir, None, &LocalFs, config.as_ref())
        .with_context(|| format!("Failed to read contents from {:?}", data_dir))?;

    let issues = check_links(&data, config.as_ref());
    for issue in &issues {
        println!("{}", tree_print::render_issue(issue));
    }

    if issues.is_empty() {
        println!("All links OK");
        Ok(())
    } else {
        Err(CliError::LinkIssues(issues.len()).into())
    }
}

fn main() {
    // The .env file may define SAB_DATA_DIR, clap picks it up via `env`.
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    if cli.verbose > 0 {
        logger::set_log_level(Level::from_verbosity(cli.verbose).max(logger::get_log_level()));
        logger::enable_print_log();
    }

    if !cli.data_dir.is_dir() {
        eprintln!("Error: {}", CliError::NotADirectory(cli.data_dir.clone()));
        eprintln!("Use the --data-dir option or set the SAB_DATA_DIR environment variable.");
        exit(1);
    }

    let command_result = match cli.command {
        Commands::Convert { dest_dir, output, config, no_copy } => {
            convert(&cli.data_dir, dest_dir, output, config.as_deref(), no_copy)
        }
        Commands::Tree { config, dest_dir } => print_tree(&cli.data_dir, dest_dir.as_deref(), config.as_deref()),
        Commands::CheckLinks { config } => report_links(&cli.data_dir, config.as_deref()),
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
