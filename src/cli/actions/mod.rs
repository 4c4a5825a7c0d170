pub mod create_user;
pub mod server;

use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    CreateUser(create_user::Args),
}

impl Action {
    /// Run the selected action to completion.
    ///
    /// # Errors
    /// Returns whatever error the action produced.
    pub async fn execute(self) -> Result<()> {
        debug!("Executing action: {:?}", self);

        match self {
            Self::Server(args) => server::execute(args).await,
            Self::CreateUser(args) => create_user::execute(args).await,
        }
    }
}
