//! Mode controller: legal transitions, history reset, welcome injection.

use std::sync::Arc;

use geomentor::app::App;
use geomentor::auth::CredentialRegistry;
use geomentor::config::UserEntry;
use geomentor::session::{
    switch_mode, welcome_message, Mode, ModeChange, Profile, Role, Session, Speaker,
};

use crate::mock::MockBackend;

fn signed_in(role: Role, profile: Profile) -> App {
    let registry = CredentialRegistry::from_users(&[UserEntry {
        username: "tester".to_owned(),
        password: "pw".to_owned(),
        role,
        profile,
    }]);
    let mut app = App::new(registry, Arc::new(MockBackend::default()));
    if let Err(err) = app.login("tester", "pw") {
        panic!("tester should log in: {err}");
    }
    app
}

fn switch(app: &mut App, mode: Mode) -> ModeChange {
    match app.switch_mode(mode) {
        Ok(change) => change,
        Err(err) => panic!("configured app should accept mode requests: {err}"),
    }
}

#[test]
fn switch_resets_history_to_single_welcome() {
    let mut app = signed_in(Role::Student, Profile::Fresher);

    assert_eq!(
        switch(&mut app, Mode::InterviewSimulator),
        ModeChange::Switched
    );
    assert_eq!(app.session().mode(), Mode::InterviewSimulator);
    assert_eq!(app.session().history().len(), 1);
    let welcome = &app.session().history()[0];
    assert_eq!(welcome.speaker, Speaker::Assistant);
    assert!(welcome.text.starts_with("Mode B Active"));
    assert!(welcome.text.contains("Ready"));
    assert!(welcome.text.ends_with("(Fresher Mode)"));
}

#[test]
fn history_length_after_switch_depends_on_mode_kind() {
    for target in Mode::ALL {
        let mut app = signed_in(Role::Admin, Profile::General);
        let _ = switch(&mut app, target);
        let expected = usize::from(target.is_conversational());
        assert_eq!(
            app.session().history().len(),
            expected,
            "unexpected history after entering {target}"
        );
    }
}

#[test]
fn switching_away_and_back_yields_identical_welcome() {
    let mut app = signed_in(Role::Student, Profile::WorkingProfessional);
    let first = app.session().history()[0].text.clone();

    let _ = switch(&mut app, Mode::HaryanaContextualizer);
    let _ = switch(&mut app, Mode::SyllabusDecoder);

    assert_eq!(app.session().history().len(), 1);
    assert_eq!(app.session().history()[0].text, first);
}

#[test]
fn student_cannot_reach_admin_modes() {
    for target in [Mode::AdminDashboard, Mode::EvaluationLab] {
        let mut app = signed_in(Role::Student, Profile::Fresher);
        let before = app.session().history().to_vec();

        match switch(&mut app, target) {
            ModeChange::Rejected(err) => {
                assert_eq!(err.requested, target);
                assert_eq!(err.role, Some(Role::Student));
            }
            other => panic!("expected rejection, got: {other:?}"),
        }
        assert_eq!(app.session().mode(), Mode::SyllabusDecoder);
        assert_eq!(app.session().history(), before.as_slice());
    }
}

#[test]
fn signed_out_session_rejects_every_mode() {
    let mut session = Session::new();
    for target in Mode::ALL {
        assert!(matches!(
            switch_mode(&mut session, target),
            ModeChange::Rejected(_)
        ));
        assert_eq!(session.mode(), Mode::SyllabusDecoder);
        assert!(session.history().is_empty());
    }
}

#[test]
fn requesting_active_mode_is_a_no_op() {
    let mut app = signed_in(Role::Student, Profile::Fresher);
    let before = app.session().history().to_vec();

    assert_eq!(
        switch(&mut app, Mode::SyllabusDecoder),
        ModeChange::Unchanged
    );
    assert_eq!(app.session().history(), before.as_slice());
}

#[test]
fn admin_reaches_every_mode() {
    let mut app = signed_in(Role::Admin, Profile::General);
    for target in [
        Mode::EvaluationLab,
        Mode::SyllabusDecoder,
        Mode::InterviewSimulator,
        Mode::HaryanaContextualizer,
        Mode::AdminDashboard,
    ] {
        assert_eq!(switch(&mut app, target), ModeChange::Switched);
        assert_eq!(app.session().mode(), target);
    }
}

#[test]
fn welcome_text_is_pure_in_mode_and_profile() {
    let profiles = [
        Profile::Fresher,
        Profile::WorkingProfessional,
        Profile::UpscAspirant,
        Profile::General,
    ];
    for mode in Mode::ALL {
        for profile in profiles {
            assert_eq!(welcome_message(mode, profile), welcome_message(mode, profile));
            if let Some(text) = welcome_message(mode, profile) {
                assert!(text.ends_with(&format!("({profile} Mode)")));
            }
        }
    }
}

#[test]
fn welcome_texts_match_mode_letters() {
    let text = |mode| welcome_message(mode, Profile::UpscAspirant).unwrap_or_default();
    assert_eq!(
        text(Mode::SyllabusDecoder),
        "Mode A Active: Syllabus Decoder. Which topic from the HPSC syllabus shall we analyze academically? (UPSC Aspirant Mode)"
    );
    assert!(text(Mode::InterviewSimulator).contains("Type 'Ready' to begin"));
    assert!(text(Mode::HaryanaContextualizer).starts_with("Mode C Active: Haryana Contextualizer."));
}

#[test]
fn mode_names_parse_from_cli_spellings() {
    assert_eq!("B".parse::<Mode>(), Ok(Mode::InterviewSimulator));
    assert_eq!("haryana".parse::<Mode>(), Ok(Mode::HaryanaContextualizer));
    assert_eq!("admin".parse::<Mode>(), Ok(Mode::AdminDashboard));
    assert!("mode-z".parse::<Mode>().is_err());
}
