use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "record-confirm")]
#[command(about = "Review and confirm identifiers and results of JSON records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Document to work on (default: sample.json next to the program)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the form of one record
    Show {
        /// Record position, starting at 0
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Print the stored record as JSON instead of the form
        #[arg(long)]
        json: bool,
    },

    /// Find a record by confirmed identifier, then by identifier
    Search {
        #[arg(required = true)]
        term: String,
    },

    /// Overwrite the confirmed identifier and results of one record
    Modify {
        /// Record position
        #[arg(short, long, conflicts_with = "find", required_unless_present = "find")]
        index: Option<usize>,

        /// Select the record by search term instead of position
        #[arg(long)]
        find: Option<String>,

        /// New confirmed identifier (default: the current value)
        #[arg(long)]
        confirmed_identifier: Option<String>,

        /// New confirmed results, comma separated (default: the current value)
        #[arg(long, allow_hyphen_values = true)]
        confirmed_results: Option<String>,
    },

    /// Step through records interactively
    Edit,

    /// Show or change the configuration
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Document to open when --file is not given
        #[arg(long)]
        default_file: Option<PathBuf>,

        /// Spaces per indentation level when saving
        #[arg(long)]
        indent: Option<usize>,

        /// Longest edge of a rendered image, in pixels
        #[arg(long)]
        max_image_edge: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modify_by_index() {
        let cli = Cli::try_parse_from([
            "record-confirm",
            "modify",
            "--index",
            "2",
            "--confirmed-results",
            "-1, 4",
            "-f",
            "data.json",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("data.json")));
        match cli.command {
            Commands::Modify { index, find, confirmed_identifier, confirmed_results } => {
                assert_eq!(index, Some(2));
                assert_eq!(find, None);
                assert_eq!(confirmed_identifier, None);
                assert_eq!(confirmed_results.as_deref(), Some("-1, 4"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_modify_needs_a_target() {
        assert!(Cli::try_parse_from(["record-confirm", "modify"]).is_err());
        assert!(Cli::try_parse_from([
            "record-confirm", "modify", "--index", "0", "--find", "A1"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "record-confirm", "config", "--indent", "2", "--default-file", "/data/review.json", "-q"
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Config { show, default_file, indent, max_image_edge } => {
                assert!(!show);
                assert_eq!(default_file, Some(PathBuf::from("/data/review.json")));
                assert_eq!(indent, Some(2));
                assert_eq!(max_image_edge, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["record-confirm", "config", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["record-confirm", "search", "A1", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Search { ref term } if term == "A1"));
    }
}
