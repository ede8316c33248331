//! Credential registry lookups.

use geomentor::auth::{AuthError, CredentialRegistry};
use geomentor::config::UserEntry;
use geomentor::session::{Identity, Profile, Role};

#[test]
fn builtin_pairs_resolve_to_their_role_and_profile() {
    let registry = CredentialRegistry::builtin();

    assert_eq!(
        registry.authenticate("student", "123"),
        Ok(Identity {
            username: "student".to_owned(),
            role: Role::Student,
            profile: Profile::Fresher,
        })
    );
    assert_eq!(
        registry.authenticate("admin", "admin"),
        Ok(Identity {
            username: "admin".to_owned(),
            role: Role::Admin,
            profile: Profile::General,
        })
    );
}

#[test]
fn every_other_pair_fails_identically() {
    let registry = CredentialRegistry::builtin();
    for (user, pass) in [
        ("student", "admin"),
        ("admin", "123"),
        ("ADMIN", "admin"),
        ("student ", "123"),
        ("student", "123 "),
        ("guest", "guest"),
        ("", ""),
    ] {
        assert_eq!(
            registry.authenticate(user, pass),
            Err(AuthError::InvalidCredentials),
            "{user:?}/{pass:?} should be rejected"
        );
    }
}

#[test]
fn error_message_does_not_say_which_field_was_wrong() {
    assert_eq!(AuthError::InvalidCredentials.to_string(), "invalid credentials");
}

#[test]
fn configured_users_build_registry() {
    let users = vec![
        UserEntry {
            username: "ravi".to_owned(),
            password: "aravalli".to_owned(),
            role: Role::Student,
            profile: Profile::WorkingProfessional,
        },
        UserEntry {
            username: "panel".to_owned(),
            password: "shivalik".to_owned(),
            role: Role::Admin,
            profile: Profile::General,
        },
    ];
    let registry = CredentialRegistry::from_users(&users);

    assert_eq!(registry.len(), 2);
    assert!(registry.authenticate("student", "123").is_err());
    assert_eq!(
        registry
            .authenticate("ravi", "aravalli")
            .map(|identity| identity.profile),
        Ok(Profile::WorkingProfessional)
    );
    assert_eq!(
        registry.authenticate("panel", "shivalik").map(|i| i.role),
        Ok(Role::Admin)
    );
}

#[test]
fn later_duplicate_username_wins() {
    let entry = |password: &str| UserEntry {
        username: "ravi".to_owned(),
        password: password.to_owned(),
        role: Role::Student,
        profile: Profile::Fresher,
    };
    let registry = CredentialRegistry::from_users(&[entry("old"), entry("new")]);

    assert_eq!(registry.len(), 1);
    assert!(registry.authenticate("ravi", "old").is_err());
    assert!(registry.authenticate("ravi", "new").is_ok());
}
