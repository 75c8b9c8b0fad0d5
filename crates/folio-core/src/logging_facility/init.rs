//! Subscriber installation

use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output shape of the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Pretty console lines, `debug` for folio crates
    Development,
    /// One JSON object per line, `info` for folio crates
    Production,
    /// No output; tests attach `init_test_capture()` instead
    Test,
}

impl Profile {
    fn default_directives(self) -> &'static str {
        match self {
            Profile::Development => "folio=debug,tower_http=debug",
            Profile::Production | Profile::Test => "folio=info,tower_http=info",
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "pretty" => Ok(Profile::Development),
            "production" | "prod" | "json" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!(
                "unknown logging profile '{}' (expected pretty, json or test)",
                other
            )),
        }
    }
}

static INSTALLED: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// `RUST_LOG` overrides the profile's default filter. Only the first call
/// has an effect, and a subscriber installed elsewhere is left alone.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directives()));

        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init(),
            Profile::Test => tracing_subscriber::registry()
                .try_init()
                .map_err(Into::into),
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already set, keeping it");
        }
    });
}
