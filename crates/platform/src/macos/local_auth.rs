//! LocalAuthentication (`LAContext`) backend.

use crate::authenticator::{classify_auth_error, AuthPolicy, PolicyEvaluator};
use crate::error::{BridgeError, Result};
use block2::RcBlock;
use objc2::runtime::Bool;
use objc2_foundation::{NSError, NSString};
use objc2_local_authentication::{LAContext, LAPolicy};
use sync_bridge::Completer;
use tracing::debug;

/// Evaluates policies with a fresh `LAContext` per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAuthEvaluator;

fn la_policy(policy: AuthPolicy) -> LAPolicy {
    match policy {
        AuthPolicy::DeviceOwner => LAPolicy::DeviceOwnerAuthentication,
        AuthPolicy::Biometrics => LAPolicy::DeviceOwnerAuthenticationWithBiometrics,
    }
}

fn classify(error: &NSError) -> BridgeError {
    let (code, message) = super::describe(error);
    classify_auth_error(code, message)
}

impl PolicyEvaluator for LocalAuthEvaluator {
    fn can_evaluate(&self, policy: AuthPolicy) -> Result<()> {
        let context = unsafe { LAContext::new() };
        unsafe { context.canEvaluatePolicy_error(la_policy(policy)) }.map_err(|error| classify(&error))
    }

    fn evaluate(&self, policy: AuthPolicy, reason: &str, reply: Completer<Result<()>>) {
        let context = unsafe { LAContext::new() };
        let localized_reason = NSString::from_str(reason);

        // The context must outlive the prompt; the reply block owns a reference until it runs.
        let keep_alive = context.clone();
        let block = RcBlock::new(move |success: Bool, error: *mut NSError| {
            let _context = &keep_alive;
            let outcome = if success.as_bool() {
                Ok(())
            } else {
                match unsafe { error.as_ref() } {
                    Some(error) => Err(classify(error)),
                    None => Err(BridgeError::Denied),
                }
            };
            debug!(granted = outcome.is_ok(), "LocalAuthentication replied");
            reply.complete(outcome);
        });

        unsafe {
            context.evaluatePolicy_localizedReason_reply(la_policy(policy), &localized_reason, &block);
        }
    }
}
