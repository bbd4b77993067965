use clap::{Parser, Subcommand};

use crate::cli::fetch::FetchArg;

#[derive(Clone, Debug, Parser)]
#[command(name = "rangeflow", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,

    #[arg(long, global = true, default_value = "info", help = "Console log level; RUST_LOG takes precedence")]
    pub log_level: tracing::Level,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "f", name = "fetch", about = "Stream a byte range to a file or stdout")]
    Fetch(FetchArg),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_well_formed() { App::command().debug_assert(); }

    #[test]
    fn test_parse_fetch() {
        let app = App::try_parse_from([
            "rangeflow",
            "fetch",
            "http://example.com/a.flv",
            "--from",
            "100",
            "--to",
            "199",
            "-H",
            "X-Token: abc",
            "--param-seek",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(app.log_level, tracing::Level::DEBUG);
        let Commands::Fetch(arg) = app.cmd;
        assert_eq!(arg.url, "http://example.com/a.flv");
        assert_eq!(arg.from, 100);
        assert_eq!(arg.to, Some(199));
        assert_eq!(arg.headers, vec![("X-Token".to_string(), "abc".to_string())]);
        assert!(arg.param_seek);
    }

    #[test]
    fn test_rejects_malformed_header() {
        assert!(App::try_parse_from(["rangeflow", "fetch", "http://example.com/", "-H", "no-colon"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_referrer_policy() {
        assert!(
            App::try_parse_from(["rangeflow", "fetch", "http://example.com/", "--referrer-policy", "nope"])
                .is_err()
        );
    }
}
