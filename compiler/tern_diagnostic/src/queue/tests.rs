use super::*;
use pretty_assertions::assert_eq;

fn error_at(code: ErrorCode, start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(message)
        .with_label(Span::new(0, start, start + 1), "here")
}

#[test]
fn flush_sorts_by_primary_span() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.push(error_at(ErrorCode::E2002, 30, "third"));
    queue.push(error_at(ErrorCode::E2002, 10, "first"));
    queue.push(error_at(ErrorCode::E2002, 20, "second"));

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn error_limit_drops_excess_errors_but_keeps_warnings() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        ..DiagnosticConfig::unlimited()
    });
    assert!(queue.push(error_at(ErrorCode::E2001, 1, "a")));
    assert!(queue.push(error_at(ErrorCode::E2001, 2, "b")));
    assert!(!queue.push(error_at(ErrorCode::E2001, 3, "c")));
    assert!(queue.limit_reached());
    assert!(queue.push(
        Diagnostic::warning(ErrorCode::W2001)
            .with_message("unused")
            .with_label(Span::new(0, 4, 5), "here")
    ));
    assert_eq!(queue.error_count(), 2);
    assert_eq!(queue.warning_count(), 1);
}

#[test]
fn tripped_limit_is_announced_once() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        ..DiagnosticConfig::unlimited()
    });
    assert!(queue.push(error_at(ErrorCode::E2001, 1, "a")));
    assert!(!queue.push(error_at(ErrorCode::E2002, 7, "b")));
    assert!(!queue.push(error_at(ErrorCode::E2003, 9, "c")));

    let codes: Vec<_> = queue.peek().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E9002]);
    let notice = queue.peek().last().and_then(Diagnostic::primary_span);
    assert_eq!(notice, Some(Span::new(0, 7, 8)));
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn unlimited_queue_never_announces_a_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    for start in 0..200 {
        assert!(queue.push(error_at(ErrorCode::E2001, start, "again")));
    }
    assert!(!queue.has_code(ErrorCode::E9002));
    assert_eq!(queue.error_count(), 200);
}

#[test]
fn deduplicates_identical_diagnostics() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(error_at(ErrorCode::E2004, 5, "cycle")));
    assert!(!queue.push(error_at(ErrorCode::E2004, 5, "cycle")));
    assert!(queue.push(error_at(ErrorCode::E2004, 6, "cycle")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn follow_on_errors_are_filtered() {
    let mut queue = DiagnosticQueue::new();
    assert!(!queue.push(error_at(ErrorCode::E2001, 1, "cannot convert `<error>`")));
    assert!(queue.has_errors().is_none());
}

#[test]
fn has_errors_gives_proof() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());
    let _ = queue.emit_error(error_at(ErrorCode::E2003, 0, "duplicate"));
    assert!(queue.has_errors().is_some());
    assert!(queue.has_code(ErrorCode::E2003));
    assert!(!queue.has_code(ErrorCode::E2002));
}
