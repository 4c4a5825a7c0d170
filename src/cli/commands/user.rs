use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const CMD_CREATE_USER: &str = "create-user";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";

pub struct Options {
    pub email: String,
    pub password: SecretString,
}

impl Options {
    /// Read the account fields of `create-user`.
    ///
    /// # Errors
    /// Returns an error if either field is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let email = matches
            .get_one::<String>(ARG_EMAIL)
            .cloned()
            .context("missing required argument: --email")?;
        let password = matches
            .get_one::<String>(ARG_PASSWORD)
            .cloned()
            .context("missing required argument: --password")?;

        Ok(Self {
            email,
            password: SecretString::from(password),
        })
    }
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_CREATE_USER)
        .about("Create an account in the database")
        .arg(
            Arg::new(ARG_EMAIL)
                .long(ARG_EMAIL)
                .help("Account email")
                .env("JOTTER_USER_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Account password")
                .env("JOTTER_USER_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn parse_create_user() -> Result<()> {
        let matches = subcommand().get_matches_from(vec![
            CMD_CREATE_USER,
            "--email",
            "ada@example.com",
            "--password",
            "correct horse",
        ]);
        let options = Options::parse(&matches)?;
        assert_eq!(options.email, "ada@example.com");
        assert_eq!(options.password.expose_secret(), "correct horse");
        Ok(())
    }

    #[test]
    fn password_from_env() -> Result<()> {
        temp_env::with_vars(
            [
                ("JOTTER_USER_EMAIL", Some("ada@example.com")),
                ("JOTTER_USER_PASSWORD", Some("from-the-env")),
            ],
            || {
                let matches = subcommand().get_matches_from(vec![CMD_CREATE_USER]);
                let options = Options::parse(&matches)?;
                assert_eq!(options.password.expose_secret(), "from-the-env");
                Ok(())
            },
        )
    }
}
