use clap::{Arg, Command};

pub const CMD_CLIENT: &str = "client";
pub const ARG_URL: &str = "url";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password")
        .env("SESAME_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_CLIENT)
        .about("Call a running sesame server")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_URL)
                .long("url")
                .help("Base URL of the server")
                .env("SESAME_URL")
                .default_value("http://localhost:4000"),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("Where the session token is kept between calls (default: ~/.sesame-session)")
                .env("SESAME_SESSION_FILE"),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('u')
                        .long("username")
                        .help("Display name")
                        .required(true),
                )
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new("signin")
                .about("Sign in and store the session token")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(Command::new("me").about("Show the signed-in profile"))
        .subcommand(Command::new("logout").about("Clear the session"))
}
