//! Device-owner authentication (Touch ID with password fallback).
//!
//! A request moves through `NotRequested -> Prompting -> Resolved`. The
//! prompt itself is asynchronous; the bridge blocks the caller until the
//! evaluator's reply fires.

use crate::error::{BridgeError, Result};
use serde::Deserialize;
use std::time::Duration;
use sync_bridge::{block_on_timeout, Completer};
use tracing::{debug, info, warn};

/// Which credentials may satisfy the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthPolicy {
    /// Biometrics, falling back to the account password.
    #[default]
    DeviceOwner,
    /// Biometrics only.
    Biometrics,
}

/// Outcome of one authentication request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Granted,
    Denied,
    Unavailable(String),
}

impl AuthResult {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl From<Result<()>> for AuthResult {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Granted,
            Err(BridgeError::Unavailable(reason)) => Self::Unavailable(reason),
            Err(_) => Self::Denied,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NotRequested,
    Prompting,
    Resolved(bool),
}

/// Seam over the platform's identity-verification subsystem.
#[cfg_attr(test, mockall::automock)]
pub trait PolicyEvaluator: Send + Sync {
    /// Whether `policy` can be evaluated at all. Must not prompt.
    fn can_evaluate(&self, policy: AuthPolicy) -> Result<()>;

    /// Start evaluating `policy`. `reply` receives the outcome exactly once.
    fn evaluate(&self, policy: AuthPolicy, reason: &str, reply: Completer<Result<()>>);
}

/// A single prompt, created per call.
#[derive(Debug)]
pub struct AuthRequest {
    reason: String,
    state: AuthState,
}

impl AuthRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            state: AuthState::NotRequested,
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Leave `NotRequested`. Resolved requests keep their verdict.
    fn begin(&mut self) {
        if self.state == AuthState::NotRequested {
            self.state = AuthState::Prompting;
        }
    }

    /// Evaluate the request. A resolved request returns its recorded verdict
    /// without prompting again.
    pub fn run<E>(&mut self, evaluator: &E, policy: AuthPolicy, timeout: Option<Duration>) -> Result<()>
    where
        E: PolicyEvaluator + ?Sized,
    {
        match self.state {
            AuthState::Resolved(true) => return Ok(()),
            AuthState::Resolved(false) => return Err(BridgeError::Denied),
            AuthState::Prompting | AuthState::NotRequested => self.begin(),
        }

        // Capability check happens inside `Prompting`; no UI is shown when it fails.
        if let Err(err) = evaluator.can_evaluate(policy) {
            info!(?policy, error = %err, "Authentication unavailable, not prompting");
            self.state = AuthState::Resolved(false);
            return Err(err);
        }

        debug!(?policy, reason = %self.reason, "Prompting for device-owner authentication");
        crate::note_blocking_wait("authenticate");

        let outcome = block_on_timeout(|reply| evaluator.evaluate(policy, &self.reason, reply), timeout)
            .map_err(BridgeError::from)
            .and_then(|result| result);

        self.state = AuthState::Resolved(outcome.is_ok());
        match &outcome {
            Ok(()) => info!("Authentication granted"),
            Err(BridgeError::Denied) => info!("Authentication denied"),
            Err(err) => warn!(error = %err, "Authentication failed"),
        }
        outcome
    }
}

/// Blocking authenticator over a [`PolicyEvaluator`].
pub struct Authenticator<E> {
    evaluator: E,
    policy: AuthPolicy,
    timeout: Option<Duration>,
}

impl<E: PolicyEvaluator> Authenticator<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            policy: AuthPolicy::default(),
            timeout: None,
        }
    }

    pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `None` waits for the prompt indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn authenticate(&self, reason: &str) -> AuthResult {
        self.authenticate_detailed(reason).into()
    }

    pub fn authenticate_detailed(&self, reason: &str) -> Result<()> {
        AuthRequest::new(reason).run(&self.evaluator, self.policy, self.timeout)
    }
}

/// `LAError` codes, as reported in `NSError.code` for the LocalAuthentication domain.
pub mod la_error {
    pub const AUTHENTICATION_FAILED: i64 = -1;
    pub const USER_CANCEL: i64 = -2;
    pub const USER_FALLBACK: i64 = -3;
    pub const SYSTEM_CANCEL: i64 = -4;
    pub const PASSCODE_NOT_SET: i64 = -5;
    pub const BIOMETRY_NOT_AVAILABLE: i64 = -6;
    pub const BIOMETRY_NOT_ENROLLED: i64 = -7;
    pub const BIOMETRY_LOCKOUT: i64 = -8;
    pub const APP_CANCEL: i64 = -9;
    pub const INVALID_CONTEXT: i64 = -10;
    pub const COMPANION_NOT_AVAILABLE: i64 = -11;
    pub const BIOMETRY_NOT_PAIRED: i64 = -12;
    pub const BIOMETRY_DISCONNECTED: i64 = -13;
    pub const NOT_INTERACTIVE: i64 = -1004;
}

/// Map a LocalAuthentication error code onto the bridge taxonomy.
pub fn classify_auth_error(code: i64, message: impl Into<String>) -> BridgeError {
    use la_error::*;
    match code {
        AUTHENTICATION_FAILED | USER_CANCEL | USER_FALLBACK | SYSTEM_CANCEL | APP_CANCEL => {
            BridgeError::Denied
        }
        PASSCODE_NOT_SET
        | BIOMETRY_NOT_AVAILABLE
        | BIOMETRY_NOT_ENROLLED
        | BIOMETRY_LOCKOUT
        | COMPANION_NOT_AVAILABLE
        | BIOMETRY_NOT_PAIRED
        | BIOMETRY_DISCONNECTED => BridgeError::Unavailable(message.into()),
        _ => BridgeError::platform(code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use std::thread;
    use test_case::test_case;
    use tracing_test::traced_test;

    fn unavailable_evaluator() -> MockPolicyEvaluator {
        let mut evaluator = MockPolicyEvaluator::new();
        evaluator
            .expect_can_evaluate()
            .returning(|_| Err(BridgeError::Unavailable("biometry is disabled".into())));
        evaluator.expect_evaluate().times(0);
        evaluator
    }

    fn replying_evaluator(outcome: Result<()>) -> MockPolicyEvaluator {
        let mut evaluator = MockPolicyEvaluator::new();
        evaluator.expect_can_evaluate().returning(|_| Ok(()));
        evaluator
            .expect_evaluate()
            .times(1)
            .returning(move |_, _, reply| {
                let outcome = outcome.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(10));
                    reply.complete(outcome);
                });
            });
        evaluator
    }

    #[test]
    #[traced_test]
    fn unavailable_returns_false_without_prompting() {
        let authenticator = Authenticator::new(unavailable_evaluator());
        let result = authenticator.authenticate("unlock vault");
        assert_eq!(
            result,
            AuthResult::Unavailable("biometry is disabled".into())
        );
        assert!(!result.is_granted());
        assert!(logs_contain("Authentication unavailable"));
    }

    #[test]
    fn granted_reply_maps_to_granted() {
        let authenticator = Authenticator::new(replying_evaluator(Ok(())));
        assert_eq!(authenticator.authenticate("unlock vault"), AuthResult::Granted);
    }

    #[test]
    fn cancellation_maps_to_denied() {
        let cancelled = Err(classify_auth_error(la_error::USER_CANCEL, "cancelled"));
        let authenticator = Authenticator::new(replying_evaluator(cancelled));
        assert_eq!(authenticator.authenticate("unlock vault"), AuthResult::Denied);
    }

    #[test]
    fn platform_error_collapses_to_denied() {
        let failure = Err(BridgeError::platform(-42, "weird"));
        let authenticator = Authenticator::new(replying_evaluator(failure.clone()));
        assert_eq!(authenticator.authenticate_detailed("unlock vault"), failure);
        assert_eq!(
            AuthResult::from(Err(BridgeError::platform(-42, "weird"))),
            AuthResult::Denied
        );
    }

    #[test]
    fn policy_and_reason_are_forwarded() {
        let mut evaluator = MockPolicyEvaluator::new();
        evaluator
            .expect_can_evaluate()
            .with(eq(AuthPolicy::Biometrics))
            .returning(|_| Ok(()));
        evaluator
            .expect_evaluate()
            .times(1)
            .returning(|policy, reason, reply| {
                assert_eq!(policy, AuthPolicy::Biometrics);
                assert_eq!(reason, "sign release");
                reply.complete(Ok(()));
            });

        let authenticator = Authenticator::new(evaluator).with_policy(AuthPolicy::Biometrics);
        assert!(authenticator.authenticate("sign release").is_granted());
    }

    #[test]
    fn request_walks_through_states_once() {
        let evaluator = replying_evaluator(Ok(()));
        let mut request = AuthRequest::new("unlock vault");
        assert_eq!(request.state(), AuthState::NotRequested);

        assert_eq!(request.run(&evaluator, AuthPolicy::DeviceOwner, None), Ok(()));
        assert_eq!(request.state(), AuthState::Resolved(true));

        // Second run reuses the verdict; the mock allows a single evaluate call.
        assert_eq!(request.run(&evaluator, AuthPolicy::DeviceOwner, None), Ok(()));
        assert_eq!(request.reason(), "unlock vault");
    }

    #[test]
    fn unavailable_request_resolves_false_and_stays_resolved() {
        let evaluator = unavailable_evaluator();
        let mut request = AuthRequest::new("unlock vault");
        assert!(request.run(&evaluator, AuthPolicy::DeviceOwner, None).is_err());
        assert_eq!(request.state(), AuthState::Resolved(false));
        assert_eq!(
            request.run(&evaluator, AuthPolicy::DeviceOwner, None),
            Err(BridgeError::Denied)
        );
    }

    #[test]
    fn entering_a_request_moves_to_prompting_before_any_check() {
        let mut request = AuthRequest::new("unlock vault");
        request.begin();
        assert_eq!(request.state(), AuthState::Prompting);

        // A prompting request still runs the evaluator to completion.
        let evaluator = replying_evaluator(Ok(()));
        assert_eq!(request.run(&evaluator, AuthPolicy::DeviceOwner, None), Ok(()));
        assert_eq!(request.state(), AuthState::Resolved(true));

        request.begin();
        assert_eq!(request.state(), AuthState::Resolved(true));
    }

    #[test]
    fn dropped_reply_is_reported_as_abandoned() {
        let mut evaluator = MockPolicyEvaluator::new();
        evaluator.expect_can_evaluate().returning(|_| Ok(()));
        evaluator.expect_evaluate().returning(|_, _, reply| drop(reply));

        let authenticator = Authenticator::new(evaluator);
        assert_eq!(
            authenticator.authenticate_detailed("unlock vault"),
            Err(BridgeError::Abandoned)
        );
    }

    #[test]
    fn silent_prompt_times_out_when_bounded() {
        let mut evaluator = MockPolicyEvaluator::new();
        evaluator.expect_can_evaluate().returning(|_| Ok(()));
        evaluator.expect_evaluate().returning(|_, _, reply| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                drop(reply);
            });
        });

        let authenticator =
            Authenticator::new(evaluator).with_timeout(Some(Duration::from_millis(20)));
        assert_eq!(
            authenticator.authenticate_detailed("unlock vault"),
            Err(BridgeError::TimedOut)
        );
    }

    #[test_case(la_error::USER_CANCEL, BridgeError::Denied ; "user cancel")]
    #[test_case(la_error::APP_CANCEL, BridgeError::Denied ; "app cancel")]
    #[test_case(la_error::AUTHENTICATION_FAILED, BridgeError::Denied ; "failed match")]
    #[test_case(la_error::USER_FALLBACK, BridgeError::Denied ; "user fallback")]
    #[test_case(la_error::BIOMETRY_LOCKOUT, BridgeError::Unavailable("msg".into()) ; "lockout")]
    #[test_case(la_error::PASSCODE_NOT_SET, BridgeError::Unavailable("msg".into()) ; "no passcode")]
    #[test_case(la_error::BIOMETRY_NOT_ENROLLED, BridgeError::Unavailable("msg".into()) ; "not enrolled")]
    #[test_case(la_error::INVALID_CONTEXT, BridgeError::platform(-10, "msg") ; "invalid context")]
    fn classifies_local_authentication_codes(code: i64, expected: BridgeError) {
        assert_eq!(classify_auth_error(code, "msg"), expected);
    }
}
