use super::*;

#[test]
fn bearer_token_reads_authorization_header() {
    let mut req = OutboundRequest::get("/user/dashboard");
    req.headers
        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-1"));
    assert_eq!(req.bearer_token(), Some("tok-1"));
}

#[test]
fn bearer_token_absent_or_other_scheme_is_none() {
    let mut req = OutboundRequest::get("/x");
    assert_eq!(req.bearer_token(), None);
    req.headers
        .insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert_eq!(req.bearer_token(), None);
}

#[test]
fn bearer_header_formats_and_masks() {
    let credential = Credential::new("tok-1").unwrap();
    let value = bearer_header(&credential).unwrap();
    assert_eq!(value.to_str().unwrap(), "Bearer tok-1");
    assert!(value.is_sensitive());
}

#[test]
fn bearer_header_rejects_control_characters() {
    let credential = Credential::new("tok\n1").unwrap();
    assert!(bearer_header(&credential).is_none());
}

#[test]
fn response_json_decodes_and_reports_mismatch() {
    let resp = ApiResponse { status: 200, body: r#"{"ok": true}"#.into() };
    let value: serde_json::Value = resp.json().unwrap();
    assert_eq!(value["ok"], true);

    let err = resp.json::<Vec<u8>>().unwrap_err();
    assert_eq!(err.error_code(), "E_DECODE");
}

#[test]
fn server_message_reads_msg_or_message() {
    let expired = ApiError::AuthRejected { body: r#"{"msg": "Token expired"}"#.into() };
    assert_eq!(expired.server_message().as_deref(), Some("Token expired"));

    let suspended = ApiError::Status { status: 403, body: r#"{"message": "Account is suspended"}"#.into() };
    assert_eq!(suspended.server_message().as_deref(), Some("Account is suspended"));

    let plain = ApiError::Status { status: 500, body: "oops".into() };
    assert_eq!(plain.server_message(), None);
    assert_eq!(ApiError::Transport("down".into()).server_message(), None);
}

#[test]
fn retryable_classification() {
    assert!(ApiError::Transport("reset".into()).retryable());
    assert!(ApiError::Status { status: 503, body: String::new() }.retryable());
    assert!(ApiError::Status { status: 429, body: String::new() }.retryable());
    assert!(!ApiError::Status { status: 404, body: String::new() }.retryable());
    assert!(!ApiError::AuthRejected { body: String::new() }.retryable());
}
