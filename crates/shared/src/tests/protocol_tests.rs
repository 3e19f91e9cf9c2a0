use super::*;
use crate::error::{ErrorKind, KioskError};

#[test]
fn confirm_token_matches_with_or_without_terminator() {
    assert_eq!(parse_command_line("CONFIRM_OK"), Some(CommandSignal::Confirm));
    assert_eq!(parse_command_line("CONFIRM_OK\n"), Some(CommandSignal::Confirm));
    assert_eq!(
        parse_command_line("CONFIRM_OK\r\n"),
        Some(CommandSignal::Confirm)
    );
}

#[test]
fn anything_but_the_exact_token_is_ignored() {
    assert_eq!(parse_command_line(""), None);
    assert_eq!(parse_command_line("\n"), None);
    assert_eq!(parse_command_line("garbage\n"), None);
    assert_eq!(parse_command_line("confirm_ok\n"), None);
    assert_eq!(parse_command_line(" CONFIRM_OK\n"), None);
    assert_eq!(parse_command_line("CONFIRM_OK \n"), None);
}

#[test]
fn dispatch_routes_to_matching_callback() {
    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl TrackingListener for Recorder {
        fn on_add(&mut self, _: SessionId, _: SymbolId, _: f64) {
            self.0.push("add");
        }
        fn on_update(&mut self, _: SessionId, _: SymbolId, _: f64) {
            self.0.push("update");
        }
        fn on_remove(&mut self, _: SessionId, _: SymbolId) {
            self.0.push("remove");
        }
    }

    let mut recorder = Recorder::default();
    let session_id = SessionId(7);
    let symbol_id = SymbolId(1);
    recorder.dispatch(TrackingEvent::Added {
        session_id,
        symbol_id,
        angle: 0.0,
    });
    recorder.dispatch(TrackingEvent::Updated {
        session_id,
        symbol_id,
        angle: 0.5,
    });
    recorder.dispatch(TrackingEvent::Removed {
        session_id,
        symbol_id,
    });
    assert_eq!(recorder.0, vec!["add", "update", "remove"]);
}

#[test]
fn tracking_event_serializes_with_type_tag() {
    let event = TrackingEvent::Removed {
        session_id: SessionId(3),
        symbol_id: SymbolId(1),
    };
    let json = serde_json::to_value(event).expect("json");
    assert_eq!(json["type"], "removed");
    assert_eq!(json["payload"]["session_id"], 3);
}

#[test]
fn error_kinds_follow_taxonomy() {
    let failed = KioskError::Player {
        path: "videos/jeep.mp4".into(),
        message: "not found".into(),
    };
    assert_eq!(failed.kind(), ErrorKind::ResourceUnavailable);
    assert_eq!(
        failed.to_string(),
        "player failed to start 'videos/jeep.mp4': not found"
    );

    let reset = KioskError::from(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
    assert_eq!(reset.kind(), ErrorKind::Transport);
    assert_eq!(
        KioskError::Malformed("fseq without frame id".into()).kind(),
        ErrorKind::InvalidInput
    );
}
