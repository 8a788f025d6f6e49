use marketplace_config::{ConfigError, MarketplaceSettings};
use secrecy::ExposeSecret;
use std::io::Write;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "marketplace.toml",
        r#"
partner_id = "100"
secret = "s3cr3t"
fetch_all_pages = true
"#,
    );

    let settings = MarketplaceSettings::from_file(&path).unwrap();
    assert_eq!(settings.partner_id, "100");
    assert!(settings.partners_config().fetch_all_pages);
}

#[test]
fn loads_json_file_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "marketplace.json",
        r#"{"partner_id": "100", "secret": "s3cr3t", "partners_endpoint": "ftp://x"}"#,
    );

    let result = MarketplaceSettings::from_file(&path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn loads_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "marketplace.env",
        "# partner account\nMARKETPLACE_PARTNER_ID=100\nMARKETPLACE_SECRET=\"s3cr3t\"\n",
    );

    let settings = MarketplaceSettings::from_file(&path).unwrap();
    assert_eq!(settings.partner_id, "100");
    assert_eq!(settings.secret.expose_secret(), "s3cr3t");
}

#[test]
fn dotenv_with_custom_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        ".env",
        "PARTNER_TEST_PARTNER_ID=42\nPARTNER_TEST_SECRET=abc\n",
    );

    let settings = MarketplaceSettings::from_dotenv(&path, "PARTNER_TEST").unwrap();
    assert_eq!(settings.credentials().unwrap().partner_id(), "42");
}

#[test]
fn missing_file_is_a_load_error() {
    let result = MarketplaceSettings::from_file("/nonexistent/marketplace.toml");
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}
