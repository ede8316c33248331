//! Backend turn list construction.

use geomentor::prompts::{alternation_violations, build_request_payload};
use geomentor::providers::{Turn, TurnRole};
use geomentor::session::Message;

#[test]
fn empty_history_yields_single_user_turn() {
    let turns = build_request_payload(&[], "Explain the Coriolis force");
    assert_eq!(turns, vec![Turn::user("Explain the Coriolis force")]);
}

#[test]
fn history_maps_to_roles_in_order_with_input_last() {
    let history = vec![
        Message::assistant("Mode B Active"),
        Message::user("Ready"),
        Message::assistant("Q1: What is a doab?"),
    ];
    let turns = build_request_payload(&history, "Land between two rivers.");

    assert_eq!(
        turns,
        vec![
            Turn::model("Mode B Active"),
            Turn::user("Ready"),
            Turn::model("Q1: What is a doab?"),
            Turn::user("Land between two rivers."),
        ]
    );
}

#[test]
fn consecutive_same_role_entries_are_kept_verbatim() {
    let history = vec![
        Message::assistant("welcome"),
        Message::user("first try"),
        Message::assistant("Error connecting to AI: network error: timeout"),
        Message::assistant("extra"),
    ];
    let turns = build_request_payload(&history, "second try");

    assert_eq!(turns.len(), 5);
    assert_eq!(turns[2].role, TurnRole::Model);
    assert_eq!(turns[3].role, TurnRole::Model);
    assert_eq!(turns[3].text, "extra");
    assert_eq!(alternation_violations(&turns), vec![3]);
}

#[test]
fn alternation_violations_lists_every_repeat() {
    let turns = vec![
        Turn::user("a"),
        Turn::user("b"),
        Turn::user("c"),
        Turn::model("d"),
    ];
    assert_eq!(alternation_violations(&turns), vec![1, 2]);
}

#[test]
fn alternation_depends_on_history_tail() {
    let turns = build_request_payload(&[Message::assistant("hi"), Message::user("q")], "r");
    // model, user, user: the new input repeats the user role.
    assert_eq!(alternation_violations(&turns), vec![2]);

    let alternating = build_request_payload(&[Message::assistant("hi")], "q");
    assert!(alternation_violations(&alternating).is_empty());
}

#[test]
fn message_text_is_not_trimmed_or_rewritten() {
    let turns = build_request_payload(&[Message::user("  spaced  ")], "\tinput\n");
    assert_eq!(turns[0].text, "  spaced  ");
    assert_eq!(turns[1].text, "\tinput\n");
}
