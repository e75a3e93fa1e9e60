// CLI module for argument parsing and configuration

use crate::domain::{FeedFilter, WrapPolicy, DEFAULT_SWIPE_THRESHOLD};
use crate::source::LocalCache;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Jobswp - swipe through job vacancies in your terminal
///
/// One vacancy per card, premium employers first. Drag a card up or down
/// with the mouse, or use the arrow keys.
#[derive(Parser, Debug, Clone)]
#[command(name = "jobswp")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Vacancy cache file
    ///
    /// Defaults to vacancies.json in the platform data directory.
    #[arg(long = "cache")]
    pub cache: Option<PathBuf>,

    /// Base URL of the vacancy listing service
    #[arg(long = "listing-url")]
    pub listing_url: Option<String>,

    /// URL of the external job board feed
    #[arg(long = "feed-url")]
    pub feed_url: Option<String>,

    /// Do not contact any remote service
    #[arg(long = "offline", action = ArgAction::SetTrue)]
    pub offline: bool,

    /// Initial search text
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Only show vacancies with one of these tags
    ///
    /// Can be specified multiple times.
    /// Example: --tag "Part-time" --tag "For students"
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Only show vacancies in this city (exact match)
    #[arg(short = 'c', long = "city")]
    pub city: Option<String>,

    /// Stop at the first card instead of wrapping to the last
    #[arg(long = "no-wrap", action = ArgAction::SetTrue)]
    pub no_wrap: bool,

    /// Drag distance needed to change cards, in pixels
    #[arg(long = "threshold", default_value_t = DEFAULT_SWIPE_THRESHOLD)]
    pub threshold: f32,

    /// Log file (defaults to jobswp.log in the platform cache directory)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Show the welcome screen even if it was already shown
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    pub fn wrap_policy(&self) -> WrapPolicy {
        if self.no_wrap {
            WrapPolicy::StopAtFirst
        } else {
            WrapPolicy::Wrap
        }
    }

    /// Filter the session starts with
    pub fn initial_filter(&self) -> FeedFilter {
        FeedFilter {
            search: self.search.clone().unwrap_or_default(),
            tags: self.tags.iter().cloned().collect(),
            city: self.city.clone().filter(|c| !c.is_empty()),
        }
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(format!(
                "threshold must be a positive number of pixels, got {}",
                self.threshold
            ));
        }

        for (flag, url) in [
            ("listing-url", &self.listing_url),
            ("feed-url", &self.feed_url),
        ] {
            if let Some(url) = url {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("{} must be an http(s) URL: '{}'", flag, url));
                }
            }
        }

        if let Some(ref cache) = self.cache {
            if cache.is_dir() {
                return Err(format!("Cache path is a directory: {}", cache.display()));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` keeps the vacancies in memory only
    pub cache_path: Option<PathBuf>,
    pub listing_url: Option<String>,
    pub feed_url: Option<String>,
    pub filter: FeedFilter,
    /// Whether the city came from the command line rather than saved preferences
    pub city_from_args: bool,
    pub wrap_policy: WrapPolicy,
    pub threshold: f32,
    pub log_file: Option<PathBuf>,
    pub force_welcome: bool,
}

impl AppConfig {
    pub fn is_offline(&self) -> bool {
        self.listing_url.is_none() && self.feed_url.is_none()
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        let (listing_url, feed_url) = if args.offline {
            (None, None)
        } else {
            (args.listing_url.clone(), args.feed_url.clone())
        };

        AppConfig {
            cache_path: args.cache.clone().or_else(LocalCache::default_path),
            listing_url,
            feed_url,
            filter: args.initial_filter(),
            city_from_args: args.city.is_some(),
            wrap_policy: args.wrap_policy(),
            threshold: args.threshold,
            log_file: args.log_file.clone(),
            force_welcome: args.welcome,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            cache_path: None,
            listing_url: None,
            feed_url: None,
            filter: FeedFilter::default(),
            city_from_args: false,
            wrap_policy: WrapPolicy::Wrap,
            threshold: DEFAULT_SWIPE_THRESHOLD,
            log_file: None,
            force_welcome: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> Args {
        Args {
            cache: None,
            listing_url: None,
            feed_url: None,
            offline: false,
            search: None,
            tags: vec![],
            city: None,
            no_wrap: false,
            threshold: DEFAULT_SWIPE_THRESHOLD,
            log_file: None,
            welcome: false,
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_parse_from_command_line() {
            let args = Args::try_parse_from([
                "jobswp",
                "--tag",
                "Part-time",
                "--tag",
                "For students",
                "--city",
                "Kirov",
                "--no-wrap",
                "--threshold",
                "120",
            ])
            .unwrap();

            assert_eq!(args.tags, vec!["Part-time", "For students"]);
            assert_eq!(args.city.as_deref(), Some("Kirov"));
            assert_eq!(args.wrap_policy(), WrapPolicy::StopAtFirst);
            assert_eq!(args.threshold, 120.0);
        }

        #[test]
        fn test_defaults() {
            let args = Args::try_parse_from(["jobswp"]).unwrap();
            assert_eq!(args.threshold, DEFAULT_SWIPE_THRESHOLD);
            assert_eq!(args.wrap_policy(), WrapPolicy::Wrap);
            assert!(args.tags.is_empty());
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_initial_filter() {
            let args = Args {
                search: Some("courier".to_string()),
                tags: vec!["Daily pay".to_string()],
                city: Some(String::new()),
                ..default_args()
            };

            let filter = args.initial_filter();
            assert_eq!(filter.search, "courier");
            assert!(filter.tags.contains("Daily pay"));
            assert!(filter.city.is_none());
        }

        #[test]
        fn test_validate_rejects_non_positive_threshold() {
            for threshold in [0.0, -5.0, f32::NAN] {
                let args = Args {
                    threshold,
                    ..default_args()
                };
                let result = args.validate();
                assert!(result.is_err());
                assert!(result.unwrap_err().contains("threshold"));
            }
        }

        #[test]
        fn test_validate_rejects_bad_url() {
            let args = Args {
                feed_url: Some("ftp://feed".to_string()),
                ..default_args()
            };
            let result = args.validate();
            assert!(result.unwrap_err().contains("feed-url"));
        }

        #[test]
        fn test_validate_rejects_directory_cache() {
            let temp_dir = tempfile::TempDir::new().unwrap();
            let args = Args {
                cache: Some(temp_dir.path().to_path_buf()),
                ..default_args()
            };
            assert!(args.validate().unwrap_err().contains("directory"));
        }
    }

    mod app_config_tests {
        use super::*;

        #[test]
        fn test_app_config_from_args() {
            let args = Args {
                cache: Some(PathBuf::from("/tmp/v.json")),
                listing_url: Some("https://api.test/admin".to_string()),
                city: Some("Moscow".to_string()),
                no_wrap: true,
                welcome: true,
                ..default_args()
            };

            let config = AppConfig::from(args);
            assert_eq!(config.cache_path, Some(PathBuf::from("/tmp/v.json")));
            assert_eq!(config.listing_url.as_deref(), Some("https://api.test/admin"));
            assert_eq!(config.filter.city.as_deref(), Some("Moscow"));
            assert!(config.city_from_args);
            assert_eq!(config.wrap_policy, WrapPolicy::StopAtFirst);
            assert!(config.force_welcome);
            assert!(!config.is_offline());
        }

        #[test]
        fn test_offline_drops_urls() {
            let args = Args {
                listing_url: Some("https://api.test/admin".to_string()),
                feed_url: Some("https://api.test/feed".to_string()),
                offline: true,
                ..default_args()
            };

            let config = AppConfig::from(args);
            assert!(config.listing_url.is_none());
            assert!(config.feed_url.is_none());
            assert!(config.is_offline());
        }

        #[test]
        fn test_app_config_default() {
            let config = AppConfig::default();
            assert!(config.cache_path.is_none());
            assert!(config.filter.is_empty());
            assert_eq!(config.threshold, DEFAULT_SWIPE_THRESHOLD);
            assert_eq!(config.wrap_policy, WrapPolicy::Wrap);
        }
    }
}
