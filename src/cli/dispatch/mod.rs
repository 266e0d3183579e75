use crate::{
    cli::{
        actions::{client, server, Action},
        commands::{auth, client as client_args, database, ARG_PORT},
    },
    client::SessionFile,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((client_args::CMD_CLIENT, sub)) => client_action(sub),
        _ => server_action(matches),
    }
}

fn server_action(matches: &ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(4000);
    let dsn = matches
        .get_one::<String>(database::ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;
    let jwt_secret = matches
        .get_one::<String>(auth::ARG_JWT_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --jwt-secret")?;
    let frontend_origin = matches
        .get_one::<String>(auth::ARG_FRONTEND_ORIGIN)
        .cloned()
        .context("missing required argument: --frontend-origin")?;
    let session_ttl_seconds = matches
        .get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS)
        .copied()
        .context("missing required argument: --session-ttl-seconds")?;

    Ok(Action::Server(server::Args {
        port,
        dsn,
        db_username: matches.get_one::<String>(database::ARG_DB_USERNAME).cloned(),
        db_password: matches
            .get_one::<String>(database::ARG_DB_PASSWORD)
            .cloned()
            .map(SecretString::from),
        jwt_secret,
        frontend_origin,
        cookie_secure: matches.get_flag(auth::ARG_COOKIE_SECURE),
        session_ttl_seconds,
    }))
}

fn client_action(matches: &ArgMatches) -> Result<Action> {
    let url = matches
        .get_one::<String>(client_args::ARG_URL)
        .cloned()
        .context("missing required argument: --url")?;
    let session_file = matches
        .get_one::<String>(client_args::ARG_SESSION_FILE)
        .map_or_else(SessionFile::default_path, PathBuf::from);

    let required = |sub: &ArgMatches, id: &str| -> Result<String> {
        sub.get_one::<String>(id)
            .cloned()
            .with_context(|| format!("missing required argument: --{id}"))
    };

    let command = match matches.subcommand() {
        Some(("signup", sub)) => client::Command::Signup {
            username: required(sub, client_args::ARG_USERNAME)?,
            email: required(sub, client_args::ARG_EMAIL)?,
            password: SecretString::from(required(sub, client_args::ARG_PASSWORD)?),
        },
        Some(("signin", sub)) => client::Command::Signin {
            email: required(sub, client_args::ARG_EMAIL)?,
            password: SecretString::from(required(sub, client_args::ARG_PASSWORD)?),
        },
        Some(("me", _)) => client::Command::Me,
        Some(("logout", _)) => client::Command::Logout,
        Some((other, _)) => return Err(anyhow!("unknown client command: {other}")),
        None => return Err(anyhow!("missing client command")),
    };

    Ok(Action::Client(client::Args {
        url,
        session_file,
        command,
    }))
}
