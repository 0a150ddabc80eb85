// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::ExtensionSet;
use crate::error::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Flicksort - page through images and sort them into numbered folders
///
/// Press a digit key to move the current image into a sibling folder named
/// after that digit. Drop files or folders onto the terminal to queue them.
#[derive(Parser, Debug, Clone)]
#[command(name = "flicksort")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Files or directories to queue at startup
    ///
    /// Directories are searched recursively. More paths can be dropped
    /// onto the terminal or added with 'a' while running.
    pub paths: Vec<PathBuf>,

    /// Image extension(s) to recognise, replacing the configured list
    ///
    /// Can be specified multiple times. Example: --ext png --ext webp
    #[arg(short = 'e', long = "ext")]
    pub extensions: Vec<String>,

    /// Show the welcome screen even if it was dismissed before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub show_welcome: bool,

    /// Write the log to this file instead of the default location
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err(format!("Invalid extension: '{}'", bad));
        }

        if let Some(ref log_file) = self.log_file {
            if log_file.is_dir() {
                return Err(format!(
                    "Log file path is a directory: {}",
                    log_file.display()
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub paths: Vec<PathBuf>,
    /// Extensions from the command line; `None` defers to the user config
    pub extensions: Option<Vec<String>>,
    pub show_welcome: bool,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves the extension set: command line first, then the user config
    pub fn extension_set(&self, user_config: &UserConfig) -> Result<ExtensionSet> {
        match self.extensions {
            Some(ref extensions) => ExtensionSet::new(extensions),
            None => user_config.extension_set(),
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            paths: args.paths,
            extensions: if args.extensions.is_empty() {
                None
            } else {
                Some(args.extensions)
            },
            show_welcome: args.show_welcome,
            log_file: args.log_file,
        }
    }
}
