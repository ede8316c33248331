//! Startup configuration: missing API key and configured registries.

use std::collections::BTreeMap;
use std::path::Path;

use geomentor::app::{App, AppError};
use geomentor::config::Config;
use geomentor::credentials::Credentials;
use geomentor::session::{Mode, Profile, Role};

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_file() -> &'static Path {
    Path::new("/nonexistent/.geomentor/.env")
}

fn unconfigured_app() -> App {
    match App::from_config(&Config::default(), &Credentials::default(), no_env, env_file()) {
        Ok(app) => app,
        Err(err) => panic!("app should build: {err}"),
    }
}

#[tokio::test]
async fn missing_key_refuses_every_event() {
    let mut app = unconfigured_app();

    let missing = match app.configuration_error() {
        Some(missing) => missing.clone(),
        None => panic!("app should report missing configuration"),
    };
    assert_eq!(missing.env_var, "GOOGLE_API_KEY");
    assert!(missing.to_string().contains("GOOGLE_API_KEY"));

    assert_eq!(
        app.login("student", "123").map(|i| i.clone()),
        Err(AppError::NotConfigured(missing.clone()))
    );
    assert_eq!(
        app.switch_mode(Mode::InterviewSimulator),
        Err(AppError::NotConfigured(missing.clone()))
    );
    assert_eq!(
        app.submit_turn("hello").await,
        Err(AppError::NotConfigured(missing))
    );
    assert!(!app.session().is_signed_in());

    app.logout();
    assert!(app.session().history().is_empty());
}

#[test]
fn key_from_environment_configures_backend() {
    let env = |key: &str| (key == "GOOGLE_API_KEY").then(|| "AIza-test".to_owned());
    let app = match App::from_config(&Config::default(), &Credentials::default(), env, env_file()) {
        Ok(app) => app,
        Err(err) => panic!("app should build: {err}"),
    };
    assert!(app.configuration_error().is_none());
}

#[test]
fn key_from_env_file_configures_backend() {
    let mut vars = BTreeMap::new();
    vars.insert("GOOGLE_API_KEY".to_owned(), "AIza-from-file".to_owned());
    let credentials = Credentials::from_map(vars);

    let app = match App::from_config(&Config::default(), &credentials, no_env, env_file()) {
        Ok(app) => app,
        Err(err) => panic!("app should build: {err}"),
    };
    assert!(app.configuration_error().is_none());
}

#[test]
fn custom_key_variable_is_honoured() {
    let config = match Config::from_toml("[backend]\napi_key_env = \"HPSC_GEMINI_KEY\"\n") {
        Ok(config) => config,
        Err(err) => panic!("config should parse: {err}"),
    };
    let default_only = |key: &str| (key == "GOOGLE_API_KEY").then(|| "ignored".to_owned());

    let app = match App::from_config(&config, &Credentials::default(), default_only, env_file()) {
        Ok(app) => app,
        Err(err) => panic!("app should build: {err}"),
    };
    assert_eq!(
        app.configuration_error().map(|m| m.env_var.as_str()),
        Some("HPSC_GEMINI_KEY")
    );
}

#[test]
fn configured_users_replace_builtin_registry() {
    let config = match Config::from_toml(
        r#"
[[users]]
username = "ravi"
password = "aravalli"
role = "Student"
profile = "UPSC Aspirant"
"#,
    ) {
        Ok(config) => config,
        Err(err) => panic!("config should parse: {err}"),
    };
    let env = |key: &str| (key == "GOOGLE_API_KEY").then(|| "AIza-test".to_owned());
    let mut app = match App::from_config(&config, &Credentials::default(), env, env_file()) {
        Ok(app) => app,
        Err(err) => panic!("app should build: {err}"),
    };

    assert!(app.login("student", "123").is_err());
    let identity = match app.login("ravi", "aravalli") {
        Ok(identity) => identity.clone(),
        Err(err) => panic!("configured user should log in: {err}"),
    };
    assert_eq!(identity.role, Role::Student);
    assert_eq!(identity.profile, Profile::UpscAspirant);
    assert!(app.session().history()[0].text.ends_with("(UPSC Aspirant Mode)"));
}
