//! Command line interface definition

use clap::{Parser, Subcommand};
use nutforge_types::ColorChoice;
use std::path::PathBuf;

/// nutforge - Source-build installer for the Nutshell shell
#[derive(Parser)]
#[command(name = "nutforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Source-build installer for the Nutshell shell")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, build, and install the package, then bootstrap user config
    #[command(alias = "i")]
    Install {
        /// Recipe file (defaults to the bundled Nutshell recipe)
        #[arg(long, value_name = "PATH")]
        recipe: Option<PathBuf>,
    },

    /// Smoke-test the installed binary
    Test {
        /// Recipe file (defaults to the bundled Nutshell recipe)
        #[arg(long, value_name = "PATH")]
        recipe: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_install() {
        let cli = Cli::try_parse_from(["nutforge", "install"]).unwrap();
        assert!(matches!(cli.command, Commands::Install { recipe: None }));
        assert!(!cli.global.json);
    }

    #[test]
    fn test_parse_install_with_recipe_and_globals() {
        let cli = Cli::try_parse_from([
            "nutforge",
            "install",
            "--recipe",
            "custom.toml",
            "--json",
            "--debug",
        ])
        .unwrap();
        match cli.command {
            Commands::Install { recipe } => {
                assert_eq!(recipe, Some(PathBuf::from("custom.toml")));
            }
            Commands::Test { .. } => panic!("expected install"),
        }
        assert!(cli.global.json);
        assert!(cli.global.debug);
    }

    #[test]
    fn test_parse_test_subcommand() {
        let cli = Cli::try_parse_from(["nutforge", "test", "--color", "never"]).unwrap();
        assert!(matches!(cli.command, Commands::Test { recipe: None }));
        assert_eq!(cli.global.color, Some(ColorChoice::Never));
    }

    #[test]
    fn test_install_alias() {
        let cli = Cli::try_parse_from(["nutforge", "i"]).unwrap();
        assert!(matches!(cli.command, Commands::Install { .. }));
    }
}
