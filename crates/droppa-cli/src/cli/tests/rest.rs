//! Tests for watch, device subcommands and global overrides.

use super::{parse, parse_cli};
use crate::cli::{Cli, CliCommand, FeedArg, VariantArg};
use clap::Parser;
use droppa_core::config::{DroppaConfig, Variant};

#[test]
fn cli_parse_watch_feeds() {
    for (arg, feed) in [
        ("incoming", FeedArg::Incoming),
        ("zipping", FeedArg::Zipping),
        ("devices", FeedArg::Devices),
    ] {
        match parse(&["droppa", "watch", arg]) {
            CliCommand::Watch { feed: parsed } => assert_eq!(parsed, feed),
            _ => panic!("expected Watch"),
        }
    }
    assert!(Cli::try_parse_from(["droppa", "watch", "uploads"]).is_err());
}

#[test]
fn cli_parse_device_commands() {
    assert!(matches!(parse(&["droppa", "register"]), CliCommand::Register));
    assert!(matches!(parse(&["droppa", "unregister"]), CliCommand::Unregister));
    assert!(matches!(parse(&["droppa", "connect"]), CliCommand::Connect));
}

#[test]
fn cli_parse_globals_after_subcommand() {
    let cli = parse_cli(&[
        "droppa",
        "send",
        "a.txt",
        "--server",
        "http://192.168.1.20:6969",
        "--variant",
        "mobile",
        "--device-name",
        "phone",
    ]);
    assert_eq!(cli.server.as_deref(), Some("http://192.168.1.20:6969"));
    assert_eq!(cli.variant, Some(VariantArg::Mobile));
    assert_eq!(cli.device_name.as_deref(), Some("phone"));
}

#[test]
fn overrides_replace_config_values() {
    let cli = parse_cli(&["droppa", "--server", "http://10.0.0.2:7000", "--variant", "desktop", "fetch"]);
    let mut cfg = DroppaConfig::default();
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.server_url, "http://10.0.0.2:7000");
    assert_eq!(cfg.variant, Variant::Desktop);
    assert!(cfg.device_name.is_none());
}

#[test]
fn no_overrides_keep_config() {
    let cli = parse_cli(&["droppa", "register"]);
    let mut cfg = DroppaConfig {
        device_name: Some("laptop".into()),
        ..DroppaConfig::default()
    };
    cli.apply_overrides(&mut cfg);
    assert_eq!(cfg.server_url, "http://127.0.0.1:6969");
    assert_eq!(cfg.device_name.as_deref(), Some("laptop"));
}
