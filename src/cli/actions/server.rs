use crate::{
    api,
    auth::{AuthConfig, AuthService},
    password::Hasher,
    store::{MemoryUserStore, PgUserStore, UserStore},
};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub const MEMORY_DSN: &str = "memory://";

pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub db_username: Option<String>,
    pub db_password: Option<SecretString>,
    pub jwt_secret: SecretString,
    pub frontend_origin: String,
    pub cookie_secure: bool,
    pub session_ttl_seconds: i64,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("dsn", &redact_dsn(&self.dsn))
            .field("db_username", &self.db_username)
            .field("db_password", &self.db_password.as_ref().map(|_| "***"))
            .field("jwt_secret", &"***")
            .field("frontend_origin", &self.frontend_origin)
            .field("cookie_secure", &self.cookie_secure)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .finish()
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable, migrations fail, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let store = open_store(&args).await?;

    let config = AuthConfig::new(args.frontend_origin)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure);

    let auth = AuthService::new(config, &args.jwt_secret, store, Hasher::default())
        .context("Failed to initialize auth service")?;

    api::new(args.port, Arc::new(auth)).await
}

async fn open_store(args: &Args) -> Result<Arc<dyn UserStore>> {
    if args.dsn == MEMORY_DSN {
        warn!("Using in-memory user store; accounts are lost on restart");
        return Ok(Arc::new(MemoryUserStore::new()));
    }

    let dsn = dsn_with_credentials(
        &args.dsn,
        args.db_username.as_deref(),
        args.db_password.as_ref(),
    )?;

    let store = PgUserStore::connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    store
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    info!("Connected to {}", redact_dsn(&dsn));

    Ok(Arc::new(store))
}

/// Inject username and password into the DSN when given separately.
fn dsn_with_credentials(
    dsn: &str,
    username: Option<&str>,
    password: Option<&SecretString>,
) -> Result<String> {
    if username.is_none() && password.is_none() {
        return Ok(dsn.to_string());
    }

    let mut dsn = Url::parse(dsn).context("Invalid database DSN")?;

    if let Some(username) = username {
        dsn.set_username(username)
            .map_err(|()| anyhow!("Error setting username"))?;
    }

    if let Some(password) = password {
        dsn.set_password(Some(password.expose_secret()))
            .map_err(|()| anyhow!("Error setting password"))?;
    }

    Ok(dsn.to_string())
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<invalid dsn>".to_string(),
    }
}
