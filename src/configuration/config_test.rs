use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    insta::assert_snapshot!(res, @r###"
    # Time to wait in milliseconds before timing out when probing the backend.
    health-check-timeout = 1000

    # Base URL of the document assistant backend.
    url = "http://127.0.0.1:8000"

    # Your user name displayed in all chat bubbles.
    # username = ""
    "###);
}

#[test]
fn it_serializes_the_url_with_its_default() {
    let res = Config::serialize_default(cli::build());
    assert!(res.contains("url = \"http://127.0.0.1:8000\""));
    assert!(res.contains("health-check-timeout = 1000"));
    assert!(!res.contains("session-id"));
}

#[test]
fn it_has_defaults() {
    assert_eq!(Config::default(ConfigKey::Url), "http://127.0.0.1:8000");
    assert_eq!(Config::default(ConfigKey::HealthCheckTimeout), "1000");
    assert_eq!(Config::default(ConfigKey::SessionID), "");
    assert!(!Config::default(ConfigKey::Username).is_empty());
    assert!(Config::default(ConfigKey::ConfigFile).ends_with("config.toml"));
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "docassist",
        "--username",
        "testuser",
        "chat",
        "-c",
        "./config.example.toml",
        "--session-id",
        "session-1-abc",
    ])?;
    let (_, chat_matches) = matches.subcommand().unwrap();
    Config::load(vec![&matches, chat_matches]).await?;

    assert_eq!(Config::get(ConfigKey::Url), "http://127.0.0.1:8000");
    assert_eq!(Config::get(ConfigKey::HealthCheckTimeout), "1000");
    assert_eq!(Config::get(ConfigKey::Username), "testuser");
    assert_eq!(Config::get(ConfigKey::SessionID), "session-1-abc");
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "docassist",
        "chat",
        "-c",
        "./test/bad-config.toml",
    ])?;
    let (_, chat_matches) = matches.subcommand().unwrap();
    let res = Config::load(vec![&matches, chat_matches]).await;
    assert!(res.is_err());
    return Ok(());
}
