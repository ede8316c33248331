//! Coverage for credential loading, permission checks, and key resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use geomentor::credentials::{
    load_credentials, load_optional_credentials, resolve_api_key, ApiKey, Credentials,
};

fn temp_env_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join(".env");
    (dir, path)
}

fn write_private(path: &Path, contents: &str) {
    fs::write(path, contents).expect("should write env file");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .expect("should restrict env file");
    }
}

fn file_with(key: &str, value: &str) -> Credentials {
    let mut vars = BTreeMap::new();
    vars.insert(key.to_owned(), value.to_owned());
    Credentials::from_map(vars)
}

#[test]
fn loads_env_credentials() {
    let (_dir, env_path) = temp_env_path();
    write_private(&env_path, "GOOGLE_API_KEY=AIza-file\nOTHER=1\n");

    let credentials = match load_credentials(&env_path) {
        Ok(credentials) => credentials,
        Err(err) => panic!("credentials should load: {err}"),
    };
    assert_eq!(credentials.get("GOOGLE_API_KEY"), Some("AIza-file"));
    assert_eq!(credentials.get("OTHER"), Some("1"));
    assert_eq!(credentials.get("MISSING"), None);
}

#[cfg(unix)]
#[test]
fn rejects_world_readable_env_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, env_path) = temp_env_path();
    assert!(fs::write(&env_path, "GOOGLE_API_KEY=AIza-file\n").is_ok());
    assert!(fs::set_permissions(&env_path, fs::Permissions::from_mode(0o644)).is_ok());

    assert!(load_credentials(&env_path).is_err());
    assert!(load_optional_credentials(&env_path).is_err());
}

#[test]
fn load_credentials_requires_existing_file() {
    let (_dir, env_path) = temp_env_path();
    assert!(load_credentials(&env_path).is_err());
}

#[test]
fn optional_credentials_default_to_empty() {
    let (_dir, env_path) = temp_env_path();
    let credentials = match load_optional_credentials(&env_path) {
        Ok(credentials) => credentials,
        Err(err) => panic!("missing file should be fine: {err}"),
    };
    assert_eq!(credentials.get("GOOGLE_API_KEY"), None);
}

#[test]
fn environment_wins_over_env_file() {
    let file = file_with("GOOGLE_API_KEY", "from-file");
    let key = resolve_api_key(
        "GOOGLE_API_KEY",
        |_| Some("from-env".to_owned()),
        &file,
        Path::new(".env"),
    );
    assert_eq!(key, Ok(ApiKey::new("from-env")));
}

#[test]
fn env_file_is_the_fallback() {
    let file = file_with("GOOGLE_API_KEY", "  from-file \n");
    let key = resolve_api_key("GOOGLE_API_KEY", |_| None, &file, Path::new(".env"));
    assert_eq!(key, Ok(ApiKey::new("from-file")));
}

#[test]
fn blank_values_count_as_missing() {
    let file = file_with("GOOGLE_API_KEY", "   ");
    let result = resolve_api_key(
        "GOOGLE_API_KEY",
        |_| Some(String::new()),
        &file,
        Path::new("/home/u/.geomentor/.env"),
    );
    let missing = match result {
        Ok(_) => panic!("blank key should be missing"),
        Err(missing) => missing,
    };
    assert_eq!(missing.env_var, "GOOGLE_API_KEY");
    assert_eq!(missing.env_file, PathBuf::from("/home/u/.geomentor/.env"));
    assert_eq!(
        missing.to_string(),
        "missing backend API key: set GOOGLE_API_KEY in the environment or in /home/u/.geomentor/.env"
    );
}

#[test]
fn debug_output_never_shows_secrets() {
    let file = file_with("GOOGLE_API_KEY", "AIza-super-secret");
    let rendered = format!("{file:?}");
    assert!(rendered.contains("GOOGLE_API_KEY"));
    assert!(!rendered.contains("AIza-super-secret"));

    let key = ApiKey::new("AIza-super-secret");
    assert!(!format!("{key:?}").contains("AIza-super-secret"));
    assert_eq!(key.expose(), "AIza-super-secret");
}
