use catalog_models::SortOrder;
use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, catalog, config, saved, search};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinebrowse")]
#[command(about = "cinebrowse - Browse a movie and series catalog from the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a daily-rotated file instead of stderr (default: logs/cinebrowse.log under the base directory)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
pub struct ListArgs {
    /// Number of pages to load (the first page plus N-1 incremental loads)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Keep titles in any script, not only Latin
    #[arg(long, action = ArgAction::SetTrue)]
    all_languages: bool,

    /// Save the listed title with this id for later `saved show`
    #[arg(long, value_name = "ID")]
    save: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List movies
    Movies {
        /// Genre id (0 = all genres, see `cinebrowse genres`)
        #[arg(long, default_value_t = 0)]
        genre: i64,

        /// Sort order: created, rating, imdb, title, year or views
        #[arg(long)]
        order: Option<SortOrder>,

        #[command(flatten)]
        list: ListArgs,
    },
    /// List series
    Series {
        /// Genre id (0 = all genres, see `cinebrowse genres`)
        #[arg(long, default_value_t = 0)]
        genre: i64,

        /// Sort order: created, rating, imdb, title, year or views
        #[arg(long)]
        order: Option<SortOrder>,

        #[command(flatten)]
        list: ListArgs,
    },
    /// List titles produced in a country
    Country {
        /// Country id (see `cinebrowse countries`)
        id: i64,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Search titles by name
    #[command(long_about = "Search the catalog. With a query the search runs immediately. Without one, each line read from stdin replaces the query and results are printed once typing pauses for the configured debounce interval.")]
    Search {
        /// Query words; omit to read queries from stdin
        query: Vec<String>,

        /// Save the result with this id for later `saved show`
        #[arg(long, value_name = "ID")]
        save: Option<i64>,
    },
    /// Show the seasons and episodes of a series
    Seasons {
        /// Series id
        series_id: i64,
    },
    /// List all genres
    Genres,
    /// List all countries
    Countries,
    /// Inspect titles saved with --save
    Saved {
        #[command(subcommand)]
        cmd: SavedCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum SavedCommands {
    /// Show a saved title
    Show { id: i64 },
    /// Forget a saved title
    Clear { id: i64 },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API token)
    Show {
        /// Show the token unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a config file
    Init {
        /// Primary API host, including the API root
        #[arg(long)]
        base_url: String,

        /// API token appended to every request path
        #[arg(long)]
        token: String,

        /// Alternate host tried when the primary fails (repeatable)
        #[arg(long = "fallback-host", value_name = "URL")]
        fallback_hosts: Vec<String>,

        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| commands::path_manager().log_file()));
    logging::init_logging(cli.verbose, cli.quiet, log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli.config;

    match cli.command {
        Commands::Movies { genre, order, list } => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            let order = order.unwrap_or(ctx.config.browse.default_order);
            browse::run_browse(&ctx, browse::Listing::Movies { genre, order }, list, &output).await
        }
        Commands::Series { genre, order, list } => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            let order = order.unwrap_or(ctx.config.browse.default_order);
            browse::run_browse(&ctx, browse::Listing::Series { genre, order }, list, &output).await
        }
        Commands::Country { id, list } => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            browse::run_browse(&ctx, browse::Listing::Country { id }, list, &output).await
        }
        Commands::Search { query, save } => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            search::run_search(&ctx, query.join(" "), save, &output).await
        }
        Commands::Seasons { series_id } => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            catalog::run_seasons(&ctx, series_id, &output).await
        }
        Commands::Genres => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            catalog::run_genres(&ctx, &output).await
        }
        Commands::Countries => {
            let ctx = commands::Context::load(config_path.as_ref())?;
            catalog::run_countries(&ctx, &output).await
        }
        Commands::Saved { cmd } => saved::run_saved(cmd, &output),
        Commands::Config { cmd } => config::run_config(cmd, config_path, &output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_must_be_positive() {
        assert!(Cli::try_parse_from(["cinebrowse", "movies", "--pages", "0"]).is_err());

        let cli = Cli::try_parse_from(["cinebrowse", "series", "--pages", "3"]).unwrap();
        match cli.command {
            Commands::Series { list, .. } => assert_eq!(list.pages, 3),
            _ => panic!("expected series"),
        }
    }

    #[test]
    fn test_log_file_value_is_optional() {
        let cli = Cli::try_parse_from(["cinebrowse", "genres", "--log-file"]).unwrap();
        assert_eq!(cli.log_file, Some(None));

        let cli = Cli::try_parse_from(["cinebrowse", "genres", "--log-file", "/tmp/cb.log"]).unwrap();
        assert_eq!(cli.log_file, Some(Some(PathBuf::from("/tmp/cb.log"))));
    }

    #[test]
    fn test_order_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["cinebrowse", "movies", "--order", "IMDB"]).unwrap();
        match cli.command {
            Commands::Movies { order, .. } => assert_eq!(order, Some(SortOrder::Imdb)),
            _ => panic!("expected movies"),
        }
    }
}
