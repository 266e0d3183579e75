use crate::auth::DEFAULT_FRONTEND_ORIGIN;
use clap::{builder::NonEmptyStringValueParser, Arg, ArgAction, Command};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_FRONTEND_ORIGIN: &str = "frontend-origin";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long("jwt-secret")
                .help("Secret used to sign session tokens (HS256)")
                .env("SESAME_JWT_SECRET")
                .hide_env_values(true)
                .value_parser(NonEmptyStringValueParser::new())
                .required(true),
        )
        .arg(
            Arg::new(ARG_FRONTEND_ORIGIN)
                .long("frontend-origin")
                .help("Origin allowed by CORS to call the API with credentials")
                .env("SESAME_FRONTEND_ORIGIN")
                .default_value(DEFAULT_FRONTEND_ORIGIN),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long("cookie-secure")
                .help("Mark the session cookie Secure (serve over HTTPS)")
                .env("SESAME_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long("session-ttl-seconds")
                .help("Session token and cookie lifetime in seconds")
                .env("SESAME_SESSION_TTL_SECONDS")
                .default_value("7200")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
}
