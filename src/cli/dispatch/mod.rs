//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an [`Action`]: either serving the web
//! application or creating an account from the command line.

use crate::cli::actions::{
    Action, create_user,
    server::{self, StoreBackend},
};
use crate::cli::commands::{ARG_DSN, ARG_MEMORY_STORE, ARG_PORT, session, user};
use anyhow::{Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let dsn = matches.get_one::<String>(ARG_DSN).cloned();

    if let Some(sub_matches) = matches.subcommand_matches(user::CMD_CREATE_USER) {
        let user_opts = user::Options::parse(sub_matches)?;
        let dsn = dsn.context("missing required argument: --dsn")?;

        return Ok(Action::CreateUser(create_user::Args {
            dsn,
            email: user_opts.email,
            password: user_opts.password,
        }));
    }

    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let store = if matches.get_flag(ARG_MEMORY_STORE) {
        StoreBackend::Memory
    } else {
        StoreBackend::Postgres {
            dsn: dsn.context("missing required argument: --dsn")?,
        }
    };

    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(server::Args {
        port,
        store,
        base_url: session_opts.base_url,
        session_ttl_seconds: session_opts.session_ttl_seconds,
    }))
}
