use pretty_assertions::assert_eq;
use pyxc_ir::{FileId, Span};

use crate::{Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorCode};

fn error_at(file: u32, start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(message)
        .with_label(Span::new(FileId::new(file), start, start + 1), "here")
}

#[test]
fn test_flush_sorts_by_file_then_offset() {
    let mut queue = DiagnosticQueue::new();
    queue.push(error_at(1, 5, "b"));
    queue.push(error_at(0, 9, "a"));
    queue.push(error_at(1, 2, "c"));

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["a", "c", "b"]);
    assert!(queue.is_empty());
}

#[test]
fn test_duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(error_at(0, 1, "same")));
    assert!(!queue.push(error_at(0, 1, "same")));
    assert!(queue.push(error_at(0, 2, "same")));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_duplicates_kept_when_disabled() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.push(error_at(0, 1, "same"));
    queue.push(error_at(0, 1, "same"));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_error_limit_reports_suppressed_count() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::default().with_error_limit(2));
    for i in 0..5 {
        queue.push(error_at(0, i, &format!("e{i}")));
    }
    assert_eq!(queue.error_count(), 5);
    assert_eq!(queue.suppressed(), 3);

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 3);
    assert_eq!(flushed[2].code, ErrorCode::E9002);
    assert!(!flushed[2].is_error());
}

#[test]
fn test_guarantee_only_after_error() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.guarantee().is_none());
    let _ = queue.emit_error(error_at(0, 0, "boom"));
    assert!(queue.guarantee().is_some());
    assert!(queue.has_errors());
}
