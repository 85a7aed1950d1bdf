//! Command-line interface definitions for article_mirror.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Both paths can be provided via command-line flags or environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the article_mirror application.
///
/// The input file and the output root are explicit arguments rather than
/// being resolved against the process working directory, so runs are
/// reproducible regardless of where the binary is invoked from.
///
/// # Examples
///
/// ```sh
/// # Mirror an export into the current directory
/// article_mirror -i articles.json
///
/// # Mirror into a dedicated archive root
/// article_mirror -i backup/articles.json -o ./archive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON export of articles
    #[arg(short, long, env = "ARTICLE_MIRROR_INPUT", default_value = "articles.json")]
    pub input: PathBuf,

    /// Root directory under which per-article directories are created
    #[arg(short, long, env = "ARTICLE_MIRROR_OUTPUT", default_value = ".")]
    pub output_root: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "article_mirror",
            "--input",
            "./articles.json",
            "--output-root",
            "./archive",
        ]);

        assert_eq!(cli.input, PathBuf::from("./articles.json"));
        assert_eq!(cli.output_root, PathBuf::from("./archive"));
    }

    #[test]
    fn test_cli_short_flags_and_defaults() {
        let cli = Cli::parse_from(&["article_mirror", "-i", "/tmp/export.json"]);

        assert_eq!(cli.input, PathBuf::from("/tmp/export.json"));
        assert_eq!(cli.output_root, PathBuf::from("."));
    }
}
