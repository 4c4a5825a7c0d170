use crate::web::MAX_SESSION_TTL_SECONDS;
use anyhow::{Context, Result, bail};
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";

#[derive(Debug)]
pub struct Options {
    pub base_url: String,
    pub session_ttl_seconds: i64,
}

impl Options {
    /// Read the session and site options.
    ///
    /// # Errors
    /// Returns an error if the base URL is not an absolute http(s) URL or the TTL is
    /// outside `1..=MAX_SESSION_TTL_SECONDS`.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .cloned()
            .context("missing required argument: --base-url")?;

        let parsed = Url::parse(&base_url).context("invalid JOTTER_BASE_URL")?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("--base-url must use http or https, got {}", parsed.scheme());
        }

        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .context("missing required argument: --session-ttl-seconds")?;
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&session_ttl_seconds) {
            bail!("--session-ttl-seconds must be between 1 and {MAX_SESSION_TTL_SECONDS}");
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_ttl_seconds,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Public base URL; https enables the Secure cookie attribute")
                .env("JOTTER_BASE_URL")
                .default_value("http://localhost:8080"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds")
                .env("JOTTER_SESSION_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
}
