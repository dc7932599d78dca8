use pretty_assertions::assert_eq;
use pyxc_ir::{FileId, Span};

use crate::{Diagnostic, ErrorCode, Severity};

#[test]
fn test_builder_collects_parts() {
    let here = Span::new(FileId::new(1), 4, 9);
    let there = Span::new(FileId::new(2), 0, 3);
    let diag = Diagnostic::error(ErrorCode::E4001)
        .with_message("conflicting declarations of `add`")
        .with_label(here, "redeclared here")
        .with_secondary_label(there, "first declared here")
        .with_note("signatures must match exactly")
        .with_suggestion("make both declarations agree");

    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.primary_span(), Some(here));
    assert_eq!(diag.secondary_labels().count(), 1);
    assert_eq!(diag.notes, vec!["signatures must match exactly".to_string()]);
}

#[test]
fn test_display_format() {
    let diag = Diagnostic::error(ErrorCode::E3005)
        .with_message("`break` outside of a loop")
        .with_label(Span::new(FileId::DUMMY, 10, 15), "cannot break here")
        .with_suggestion("move the statement into a `while` or `for` body");

    assert_eq!(
        diag.to_string(),
        "error: [E3005] `break` outside of a loop\n  at 0@10..15: cannot break here\n  help: move the statement into a `while` or `for` body"
    );
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E9002).with_message("too many errors");
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_headline_carries_the_code() {
    let diag = Diagnostic::error(ErrorCode::E3014)
        .with_message("addr() requires a variable, field or element");
    assert_eq!(
        diag.headline(),
        "[E3014] addr() requires a variable, field or element"
    );
    assert_eq!(Severity::Help.to_string(), "help");
}

#[test]
fn test_first_primary_label_is_the_location() {
    let first = Span::new(FileId::new(0), 1, 2);
    let second = Span::new(FileId::new(0), 5, 6);
    let diag = Diagnostic::error(ErrorCode::E3006)
        .with_secondary_label(second, "related")
        .with_label(first, "here")
        .with_label(second, "also here");
    assert_eq!(diag.primary_span(), Some(first));
    assert_eq!(diag.secondary_labels().count(), 1);
}
