use crate::client::{AuthClient, ClientError, SessionFile};
use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
pub enum Command {
    Signup {
        username: String,
        email: String,
        password: SecretString,
    },
    Signin {
        email: String,
        password: SecretString,
    },
    Me,
    Logout,
}

#[derive(Debug)]
pub struct Args {
    pub url: String,
    pub session_file: PathBuf,
    pub command: Command,
}

/// Execute a client command against a running server.
/// # Errors
/// Returns an error if validation fails, the server rejects the request, or
/// the session file cannot be read or written.
pub async fn execute(args: Args) -> Result<()> {
    let client = AuthClient::new(&args.url).context("Failed to build client")?;
    let session = SessionFile::new(args.session_file);
    debug!("Session file: {}", session.path().display());

    let output = run(&client, &session, args.command).await?;
    println!("{output}");

    Ok(())
}

async fn run(client: &AuthClient, session: &SessionFile, command: Command) -> Result<String> {
    match command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            let response = client
                .signup(&username, &email, password.expose_secret())
                .await?;
            Ok(response.message)
        }
        Command::Signin { email, password } => {
            let token = client.signin(&email, password.expose_secret()).await?;
            session
                .save(&token)
                .await
                .context("Failed to store session")?;
            Ok("Logged in".to_string())
        }
        Command::Me => {
            let token = session
                .load()
                .await
                .context("Failed to read session")?
                .ok_or_else(|| anyhow!("Not logged in"))?;

            match client.me(&token).await {
                Ok(profile) => Ok(serde_json::to_string_pretty(&profile)?),
                Err(ClientError::Api { status, message }) if status == StatusCode::UNAUTHORIZED => {
                    // Expired or rejected; forget it so the next call starts clean.
                    session.clear().await.context("Failed to clear session")?;
                    Err(anyhow!("{message}"))
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Logout => {
            // Local logout must not depend on reaching the server.
            let token = session.load().await.context("Failed to read session")?;
            session.clear().await.context("Failed to clear session")?;
            let response = client.logout(token.as_deref()).await?;
            Ok(response.message)
        }
    }
}
