//! Command line argument parsing

use clap::{ArgGroup, Parser};
use std::time::Duration;

use crate::platform::client::HttpClientConfig;

/// Inspect video stream inventories and extract player decipher logic
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group = ArgGroup::new("target").required(true).multiple(true).args(["input", "player_js"]))]
pub struct Args {
    /// Video ID or watch URL to inspect
    pub input: Option<String>,

    /// Player script URL or local path to extract decipher logic from
    #[arg(long, value_name = "URL|PATH")]
    pub player_js: Option<String>,

    /// Metadata provider base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// HTTP timeout (e.g., 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// HTTP attempts for transient errors
    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Build the HTTP configuration from the command line flags
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.timeout_duration(),
            max_retries: self.retries,
            user_agent: self.user_agent.clone(),
            proxy_url: self.proxy.clone(),
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_verbosity_level() {
        let args = Args {
            quiet: false,
            verbose: false,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Normal);

        let args = Args {
            quiet: true,
            verbose: false,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Quiet);

        let args = Args {
            quiet: false,
            verbose: true,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Verbose);

        // Quiet wins when both flags are given
        let args = Args {
            quiet: true,
            verbose: true,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_args_timeout_duration() {
        let args = Args {
            timeout: humantime::Duration::from(Duration::from_secs(60)),
            ..Default::default()
        };
        assert_eq!(args.timeout_duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_http_config_from_flags() {
        let args = Args {
            timeout: humantime::Duration::from(Duration::from_secs(10)),
            retries: 5,
            user_agent: Some("Custom Agent".to_string()),
            proxy: Some("http://proxy:8080".to_string()),
            ..Default::default()
        };
        let config = args.http_config();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.user_agent.as_deref(), Some("Custom Agent"));
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy:8080"));
    }

    #[test]
    fn test_parse_inventory_invocation() {
        let args = Args::try_parse_from(["streamsift", "dQw4w9WgXcQ", "--json"]).unwrap();
        assert_eq!(args.input.as_deref(), Some("dQw4w9WgXcQ"));
        assert!(args.json);
        assert!(args.player_js.is_none());
        assert_eq!(args.retries, 3);
        assert_eq!(args.timeout_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_extraction_invocation() {
        let args = Args::try_parse_from([
            "streamsift",
            "--player-js",
            "https://example.com/player.js",
            "--timeout",
            "1m",
        ])
        .unwrap();
        assert!(args.input.is_none());
        assert_eq!(
            args.player_js.as_deref(),
            Some("https://example.com/player.js")
        );
        assert_eq!(args.timeout_duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_combined_invocation() {
        let args = Args::try_parse_from([
            "streamsift",
            "dQw4w9WgXcQ",
            "--player-js",
            "base.js",
            "--api-base",
            "https://meta.example.com/get_data",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(args.player_js.as_deref(), Some("base.js"));
        assert_eq!(
            args.api_base.as_deref(),
            Some("https://meta.example.com/get_data")
        );
    }

    #[test]
    fn test_parse_requires_a_target() {
        // No video input and no player script: nothing to do
        assert!(Args::try_parse_from(["streamsift"]).is_err());
        assert!(Args::try_parse_from(["streamsift", "--json"]).is_err());
    }

    #[test]
    fn test_args_default_values() {
        let args = Args::default();
        assert_eq!(args.input, None);
        assert_eq!(args.player_js, None);
        assert_eq!(args.api_base, None);
        assert!(!args.json);
        assert_eq!(args.retries, 3);
        assert_eq!(args.user_agent, None);
        assert_eq!(args.proxy, None);
        assert!(!args.verbose);
        assert!(!args.quiet);
    }
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            player_js: None,
            api_base: None,
            json: false,
            timeout: humantime::Duration::from(Duration::from_secs(30)),
            retries: 3,
            user_agent: None,
            proxy: None,
            verbose: false,
            quiet: false,
        }
    }
}
