use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RasterfitError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        RasterfitError::MultipleResizeNotAllowed { attempts: 2 }
            .to_string()
            .contains("protocol error:")
    );
    assert!(
        RasterfitError::AlreadyRealized
            .to_string()
            .contains("protocol error:")
    );
    assert!(
        RasterfitError::resource(0, 10, "zero width")
            .to_string()
            .contains("resource error:")
    );
}

#[test]
fn kinds_separate_config_from_protocol() {
    assert_eq!(RasterfitError::config("x").kind(), ErrorKind::Config);
    assert_eq!(
        RasterfitError::MultipleResizeNotAllowed { attempts: 2 }.kind(),
        ErrorKind::Protocol
    );
    assert_eq!(RasterfitError::AlreadyRealized.kind(), ErrorKind::Protocol);
    assert_eq!(
        RasterfitError::resource(1, 1, "x").kind(),
        ErrorKind::Resource
    );
}

#[test]
fn draw_error_reports_size_and_op_count() {
    let err = RasterfitError::Draw {
        width: 800,
        height: 600,
        ops: 3,
        source: Box::new(RasterfitError::resource(800, 600, "boom")),
    };
    let msg = err.to_string();
    assert!(msg.contains("800x600"));
    assert!(msg.contains("3 folded"));
    assert!(msg.contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Resource);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterfitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
