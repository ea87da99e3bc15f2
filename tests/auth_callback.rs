use almanakka::auth::parse_callback;

#[test]
fn callback_with_matching_state_yields_code() {
    let url = "/?state=abc-123&code=4/xyz&scope=calendar.readonly";
    let code = parse_callback(url, "abc-123").unwrap();
    assert_eq!(code, "4/xyz");
}

#[test]
fn parameter_order_does_not_matter() {
    let url = "/?code=4/xyz&state=abc-123";
    assert_eq!(parse_callback(url, "abc-123").unwrap(), "4/xyz");
}

#[test]
fn mismatched_state_is_rejected() {
    // A forged or replayed redirect must not produce a code
    let url = "/?state=evil&code=4/xyz";
    assert!(parse_callback(url, "abc-123").is_err());
}

#[test]
fn missing_state_is_rejected() {
    let url = "/?code=4/xyz";
    assert!(parse_callback(url, "abc-123").is_err());
}

#[test]
fn missing_code_is_rejected() {
    let url = "/?state=abc-123&error=access_denied";
    assert!(parse_callback(url, "abc-123").is_err());
}
