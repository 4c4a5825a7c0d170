use crate::{
    cli::actions::server::connect,
    store::{CreateUserOutcome, PgUserStore, UserStore},
    web::validation::{FieldErrors, validate_credentials},
};
use anyhow::{Result, anyhow, bail};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::info;

pub struct Args {
    pub dsn: String,
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Create an account with the same rules the sign-up form applies.
///
/// # Errors
/// Returns an error if the credentials are invalid, the email is taken, or the database fails.
pub async fn execute(args: Args) -> Result<()> {
    let credentials = validate_credentials(Some(&args.email), Some(args.password.expose_secret()))
        .map_err(|errors| anyhow!(first_error(errors)))?;

    let pool = connect(&args.dsn).await?;
    let users = PgUserStore::new(pool);

    match users
        .create_user(&credentials.email, &credentials.password)
        .await?
    {
        CreateUserOutcome::Created(user) => {
            info!(user_id = %user.id, "Account created");
            println!("{}", user.id);
            Ok(())
        }
        CreateUserOutcome::Conflict => bail!("A user already exists with this email"),
    }
}

fn first_error(errors: FieldErrors) -> String {
    errors
        .email
        .or(errors.password)
        .unwrap_or_else(|| "invalid credentials".to_string())
}
