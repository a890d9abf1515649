use super::*;

#[test]
fn decodes_goto_with_integer_and_float_coordinates() {
    let msg = PenMessage::decode(r#"{"type":"goToXY","x":100,"y":-50.5,"oldX":0,"oldY":0}"#)
        .unwrap();
    assert_eq!(msg, PenMessage::go_to((0.0, 0.0), (100.0, -50.5)));
}

#[test]
fn ignores_extra_fields() {
    let msg = PenMessage::decode(
        r#"{"type":"goToXY","target":"Sprite1","x":1,"y":2,"oldX":3,"oldY":4}"#,
    )
    .unwrap();
    assert_eq!(msg, PenMessage::go_to((3.0, 4.0), (1.0, 2.0)));
}

#[test]
fn clear_needs_no_coordinates() {
    assert_eq!(
        PenMessage::decode(r#"{"type":"clear"}"#).unwrap(),
        PenMessage::Clear
    );
}

#[test]
fn unknown_type_decodes_as_unknown() {
    assert_eq!(
        PenMessage::decode(r#"{"type":"penUp","x":1}"#).unwrap(),
        PenMessage::Unknown
    );
}

#[test]
fn malformed_messages_are_protocol_errors() {
    for bad in [
        "",
        "not json",
        r#"{"x":1,"y":2}"#,
        r#"{"type":"goToXY","x":1,"y":2}"#,
        r#"{"type":"goToXY","x":"1","y":2,"oldX":0,"oldY":0}"#,
    ] {
        let err = PenMessage::decode(bad).unwrap_err();
        assert!(matches!(err, PenError::Protocol(_)), "{bad:?}");
    }
}

#[test]
fn encode_uses_scratch_field_names() {
    let text = PenMessage::go_to((100.0, 100.0), (100.0, -100.0))
        .encode()
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["type"], "goToXY");
    assert_eq!(v["x"], 100.0);
    assert_eq!(v["y"], -100.0);
    assert_eq!(v["oldX"], 100.0);
    assert_eq!(v["oldY"], 100.0);
    assert_eq!(PenMessage::Clear.encode().unwrap(), r#"{"type":"clear"}"#);
}
