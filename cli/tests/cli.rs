use clap::{CommandFactory, Parser};
use rusty_gnap_cli::*;

#[test]
fn command_definition_should_be_consistent() {
    RustyCli::command().debug_assert();
}

#[test]
fn every_subcommand_should_parse() {
    for args in [
        &["rusty-gnap", "keygen"][..],
        &["rusty-gnap", "logout"],
        &["rusty-gnap", "status", "--reveal"],
        &["rusty-gnap", "verify", "a.b.c", "--server", "https://as.example"],
    ] {
        assert!(RustyCli::try_parse_from(args).is_ok(), "{args:?}");
    }
}

#[test]
fn should_parse_commands_with_global_session() {
    let cli = RustyCli::try_parse_from(["rusty-gnap", "keygen", "--alg", "ES256", "--state", "/tmp/s.json"]).unwrap();
    assert_eq!(cli.session.state.to_str(), Some("/tmp/s.json"));
    assert!(matches!(cli.cmd, Commands::Keygen { .. }));

    let cli = RustyCli::try_parse_from([
        "rusty-gnap",
        "tx",
        "access.json",
        "--client-uri",
        "https://client.example/callback",
        "--server-root",
        "https://rs.example",
    ])
    .unwrap();
    assert!(matches!(cli.cmd, Commands::Tx { .. }));

    let cli = RustyCli::try_parse_from(["rusty-gnap", "continue", "4CF492ML", "-u", "https://client.example/callback"]).unwrap();
    assert!(matches!(cli.cmd, Commands::Continue { .. }));
}

#[test]
fn should_reject_unknown_key_algorithm() {
    assert!(RustyCli::try_parse_from(["rusty-gnap", "keygen", "--alg", "HS256"]).is_err());
}

#[test]
fn keygen_then_logout_should_keep_keys() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("gnap.json");
    let state_arg = state.to_str().unwrap();

    let cli = RustyCli::try_parse_from(["rusty-gnap", "--state", state_arg, "keygen", "--alg", "ES256"]).unwrap();
    let Commands::Keygen { delegate } = cli.cmd else { panic!() };
    delegate.execute(&cli.session).unwrap();

    let cli = RustyCli::try_parse_from(["rusty-gnap", "--state", state_arg, "logout"]).unwrap();
    let Commands::Logout { delegate } = cli.cmd else { panic!() };
    delegate.execute(&cli.session).unwrap();

    let raw = std::fs::read_to_string(&state).unwrap();
    let json = serde_json::from_str::<serde_json::Value>(&raw).unwrap();
    assert_eq!(json["keys"]["publicKey"]["alg"], "ES256");
    assert_eq!(json["jwt"], "");
}
