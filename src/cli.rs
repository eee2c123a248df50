use std::path::PathBuf;

use clap::{Parser, ValueHint};

/// Command-line interface: one required config path plus presentation
/// switches.
#[derive(Parser, Debug)]
#[command(
    name = "crystalbox",
    about = "A runner tool to test functions easily with multiple inputs. Supports multiple languages.",
    version
)]
pub struct Cli {
    /// Path to the JSON file describing the test suites.
    #[arg(long = "config-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config_file: PathBuf,

    /// Disable colored output.
    #[arg(long = "no-color", action = clap::ArgAction::SetTrue)]
    pub no_color: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_is_required() {
        assert!(Cli::try_parse_from(["crystalbox"]).is_err());
    }

    #[test]
    fn parses_config_path_and_color_switch() {
        let cli =
            Cli::try_parse_from(["crystalbox", "--config-file", "tests.json", "--no-color"])
                .unwrap();
        assert_eq!(cli.config_file, PathBuf::from("tests.json"));
        assert!(cli.no_color);
    }
}
