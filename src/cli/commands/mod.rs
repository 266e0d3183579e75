pub mod auth;
pub mod client;
pub mod database;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("sesame")
        .about("Username and password authentication service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_negates_reqs(true)
        .subcommand(client::subcommand())
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("4000")
                .env("SESAME_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = database::with_args(command);
    let command = auth::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_ENV: [&str; 9] = [
        "SESAME_PORT",
        "SESAME_DSN",
        "SESAME_DB_USERNAME",
        "SESAME_DB_PASSWORD",
        "SESAME_JWT_SECRET",
        "SESAME_FRONTEND_ORIGIN",
        "SESAME_COOKIE_SECURE",
        "SESAME_SESSION_TTL_SECONDS",
        "SESAME_LOG_LEVEL",
    ];

    fn without_env<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset(SERVER_ENV, f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "sesame");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Username and password authentication service".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_server_defaults() {
        without_env(|| {
            let matches = new().get_matches_from(vec![
                "sesame",
                "--dsn",
                "postgres://localhost:5432/sesame",
                "--jwt-secret",
                "secret",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(4000));
            assert_eq!(
                matches
                    .get_one::<String>(auth::ARG_FRONTEND_ORIGIN)
                    .map(String::as_str),
                Some("http://localhost:5173")
            );
            assert_eq!(
                matches
                    .get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS)
                    .copied(),
                Some(7200)
            );
            assert!(!matches.get_flag(auth::ARG_COOKIE_SECURE));
            assert!(matches.get_one::<String>(database::ARG_DB_USERNAME).is_none());
        });
    }

    #[test]
    fn test_server_requires_dsn_and_secret() {
        without_env(|| {
            assert!(new().try_get_matches_from(vec!["sesame"]).is_err());
            assert!(new()
                .try_get_matches_from(vec!["sesame", "--dsn", "memory://"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["sesame", "--jwt-secret", "secret"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["sesame", "--dsn", "memory://", "--jwt-secret", ""])
                .is_err());
        });
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        without_env(|| {
            let result = new().try_get_matches_from(vec![
                "sesame",
                "--dsn",
                "memory://",
                "--jwt-secret",
                "secret",
                "--session-ttl-seconds",
                "0",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SESAME_PORT", Some("8443")),
                ("SESAME_DSN", Some("postgres://localhost:5432/sesame")),
                ("SESAME_DB_USERNAME", Some("sesame")),
                ("SESAME_DB_PASSWORD", Some("hunter2")),
                ("SESAME_JWT_SECRET", Some("secret")),
                ("SESAME_FRONTEND_ORIGIN", Some("https://app.sesame.dev")),
                ("SESAME_COOKIE_SECURE", Some("true")),
                ("SESAME_SESSION_TTL_SECONDS", Some("60")),
                ("SESAME_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["sesame"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8443));
                assert_eq!(
                    matches.get_one::<String>(database::ARG_DSN).cloned(),
                    Some("postgres://localhost:5432/sesame".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(database::ARG_DB_USERNAME).cloned(),
                    Some("sesame".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(auth::ARG_JWT_SECRET).cloned(),
                    Some("secret".to_string())
                );
                assert!(matches.get_flag(auth::ARG_COOKIE_SECURE));
                assert_eq!(
                    matches
                        .get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(60)
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_client_does_not_need_server_args() {
        without_env(|| {
            temp_env::with_vars_unset(["SESAME_URL", "SESAME_SESSION_FILE"], || {
                let matches = new().get_matches_from(vec!["sesame", "client", "me"]);
                let Some((name, client)) = matches.subcommand() else {
                    panic!("expected client subcommand");
                };
                assert_eq!(name, client::CMD_CLIENT);
                assert_eq!(
                    client.get_one::<String>(client::ARG_URL).cloned(),
                    Some("http://localhost:4000".to_string())
                );
                assert_eq!(client.subcommand_name(), Some("me"));
            });
        });
    }

    #[test]
    fn test_client_signup_args() {
        temp_env::with_var_unset("SESAME_PASSWORD", || {
            let matches = new().get_matches_from(vec![
                "sesame",
                "client",
                "--url",
                "http://127.0.0.1:4000",
                "signup",
                "-u",
                "alice",
                "-e",
                "a@x.com",
                "--password",
                "Secr3t!",
            ]);
            let client = matches.subcommand_matches(client::CMD_CLIENT);
            let signup = client.and_then(|client| client.subcommand_matches("signup"));
            assert!(signup.is_some());
            if let Some(signup) = signup {
                assert_eq!(
                    signup.get_one::<String>(client::ARG_USERNAME).cloned(),
                    Some("alice".to_string())
                );
                assert_eq!(
                    signup.get_one::<String>(client::ARG_PASSWORD).cloned(),
                    Some("Secr3t!".to_string())
                );
            }

            let missing_password = new().try_get_matches_from(vec![
                "sesame", "client", "signin", "-e", "a@x.com",
            ]);
            assert!(missing_password.is_err());
        });
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("SESAME_LOG_LEVEL", Some(level)),
                    ("SESAME_DSN", Some("memory://")),
                    ("SESAME_JWT_SECRET", Some("secret")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["sesame"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }
}
