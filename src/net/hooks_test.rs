use std::sync::atomic::Ordering;

use reqwest::header::HeaderValue;

use super::*;
use crate::nav::RecordingNavigator;
use crate::net::DefaultHeaders;
use crate::session::test_helpers::{alice, root_admin};
use crate::store::test_helpers::FlakyStore;

struct Fixture {
    store: Arc<FlakyStore>,
    controller: SessionController,
    nav: Arc<RecordingNavigator>,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(FlakyStore::default());
        let controller = SessionController::new(SessionState::new(), store.clone(), DefaultHeaders::new());
        Self { store, controller, nav: Arc::new(RecordingNavigator::new()) }
    }

    fn injector(&self) -> CredentialInjector {
        CredentialInjector::new(self.controller.state().clone(), self.store.clone())
    }

    fn detector(&self) -> RejectionDetector {
        RejectionDetector::new(self.controller.clone(), self.nav.clone(), "/login")
    }
}

fn carrying(token: &str) -> OutboundRequest {
    let mut req = OutboundRequest::get("/user/scores");
    req.headers
        .insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
    req
}

fn rejected() -> Result<ApiResponse, ApiError> {
    Err(ApiError::AuthRejected { body: r#"{"msg": "Token expired"}"#.into() })
}

// =============================================================================
// CredentialInjector
// =============================================================================

#[test]
fn injector_attaches_live_credential() {
    let fx = Fixture::new();
    let injector = fx.injector();
    fx.controller.login("tok-1", alice()).unwrap();

    let mut req = OutboundRequest::get("/user/dashboard");
    injector.on_request(&mut req);
    assert_eq!(req.bearer_token(), Some("tok-1"));
}

#[test]
fn injector_reads_state_at_call_time() {
    let fx = Fixture::new();
    let injector = fx.injector();
    fx.controller.restore_session();

    let mut before = OutboundRequest::get("/x");
    injector.on_request(&mut before);
    assert_eq!(before.bearer_token(), None);

    fx.controller.login("tok-1", alice()).unwrap();
    let mut during = OutboundRequest::get("/x");
    injector.on_request(&mut during);
    assert_eq!(during.bearer_token(), Some("tok-1"));

    fx.controller.logout();
    let mut after = OutboundRequest::get("/x");
    injector.on_request(&mut after);
    assert_eq!(after.bearer_token(), None);
}

#[test]
fn injector_falls_back_to_stored_token_before_restore() {
    let fx = Fixture::new();
    fx.store.inner.set(TOKEN_KEY, "tok-stored").unwrap();

    let mut req = OutboundRequest::get("/x");
    fx.injector().on_request(&mut req);
    assert_eq!(req.bearer_token(), Some("tok-stored"));
}

#[test]
fn injector_ignores_store_once_restored() {
    let fx = Fixture::new();
    fx.controller.restore_session();
    // Token left behind by a failed cleanup must not resurrect the session.
    fx.store.inner.set(TOKEN_KEY, "tok-stale").unwrap();

    let mut req = OutboundRequest::get("/x");
    fx.injector().on_request(&mut req);
    assert_eq!(req.bearer_token(), None);
}

#[test]
fn injector_swallows_store_read_errors() {
    let fx = Fixture::new();
    fx.store.fail_get.store(true, Ordering::SeqCst);

    let mut req = OutboundRequest::get("/x");
    fx.injector().on_request(&mut req);
    assert!(req.headers.is_empty());
}

#[test]
fn injector_skips_blank_stored_token() {
    let fx = Fixture::new();
    fx.store.inner.set(TOKEN_KEY, "   ").unwrap();

    let mut req = OutboundRequest::get("/x");
    fx.injector().on_request(&mut req);
    assert!(req.headers.is_empty());
}

// =============================================================================
// RejectionDetector
// =============================================================================

#[test]
fn detector_ignores_non_auth_outcomes() {
    let fx = Fixture::new();
    fx.controller.login("tok-1", alice()).unwrap();
    let detector = fx.detector();
    let req = carrying("tok-1");

    detector.on_response(&req, &Ok(ApiResponse { status: 200, body: String::new() }));
    detector.on_response(&req, &Err(ApiError::Status { status: 403, body: String::new() }));
    detector.on_response(&req, &Err(ApiError::Transport("reset".into())));

    assert!(fx.controller.state().is_authenticated());
    assert!(fx.nav.paths().is_empty());
}

#[test]
fn detector_logs_out_and_redirects_on_live_credential() {
    let fx = Fixture::new();
    fx.controller.login("tok-1", alice()).unwrap();

    fx.detector().on_response(&carrying("tok-1"), &rejected());

    assert!(!fx.controller.state().is_authenticated());
    assert!(fx.store.inner.is_empty());
    assert_eq!(fx.nav.paths(), vec!["/login"]);
}

#[test]
fn detector_burst_logs_out_once() {
    let fx = Fixture::new();
    fx.controller.login("tok-1", alice()).unwrap();
    let detector = fx.detector();
    let removes_before = fx.store.removes.load(Ordering::SeqCst);

    for _ in 0..5 {
        detector.on_response(&carrying("tok-1"), &rejected());
    }

    assert_eq!(fx.nav.paths(), vec!["/login"]);
    // One logout removes exactly the two session entries.
    assert_eq!(fx.store.removes.load(Ordering::SeqCst) - removes_before, 2);
}

#[test]
fn detector_ignores_rejection_of_replaced_credential() {
    let fx = Fixture::new();
    fx.controller.login("tok-1", alice()).unwrap();
    fx.controller.login("tok-2", root_admin()).unwrap();

    fx.detector().on_response(&carrying("tok-1"), &rejected());

    assert!(fx.controller.state().is_admin());
    assert!(fx.nav.paths().is_empty());
}

#[test]
fn detector_forces_sign_in_on_rejection_without_credential() {
    let fx = Fixture::new();
    fx.controller.login("tok-1", alice()).unwrap();

    fx.detector().on_response(&OutboundRequest::get("/user/dashboard"), &rejected());

    assert!(!fx.controller.state().is_authenticated());
    assert!(fx.store.inner.is_empty());
    assert_eq!(fx.nav.paths(), vec!["/login"]);
}

#[test]
fn detector_redirects_signed_out_rejection() {
    let fx = Fixture::new();
    fx.controller.restore_session();

    fx.detector().on_response(&OutboundRequest::get("/user/dashboard"), &rejected());

    assert!(!fx.controller.state().is_authenticated());
    assert_eq!(fx.nav.paths(), vec!["/login"]);
}

#[test]
fn hook_names_are_stable() {
    let fx = Fixture::new();
    assert_eq!(fx.injector().name(), "credential-injector");
    assert_eq!(fx.detector().name(), "rejection-detector");
}
