//! Process-wide bridge context, built on first use.
//!
//! Holds only immutable configuration and stateless backends; each exported
//! call is otherwise independently resourced.

use platform::{
    Authenticator, NativeNotificationCenter, NativePolicyEvaluator, NativeSecretStore,
    NotificationDispatcher, SecureStoreAdapter,
};
use settings::Config;
use std::sync::OnceLock;
use tracing::debug;

pub(crate) struct Bridge {
    pub authenticator: Authenticator<NativePolicyEvaluator>,
    pub store: SecureStoreAdapter<NativeSecretStore>,
    pub notifier: NotificationDispatcher<NativeNotificationCenter>,
    pub config: Config,
}

impl Bridge {
    fn from_config(config: Config) -> Self {
        let timeout = config.wait_timeout();
        Self {
            authenticator: Authenticator::new(NativePolicyEvaluator::default())
                .with_policy(config.auth_policy)
                .with_timeout(timeout),
            store: SecureStoreAdapter::new(NativeSecretStore::default()),
            notifier: NotificationDispatcher::new(NativeNotificationCenter::with_sound(
                config.notification_sound,
            ))
            .with_timeout(timeout),
            config,
        }
    }
}

static BRIDGE: OnceLock<Bridge> = OnceLock::new();

pub(crate) fn bridge() -> &'static Bridge {
    BRIDGE.get_or_init(|| {
        let config = settings::load_config();
        crate::logging::init(&config);
        debug!(?config, "Bridge context initialized");
        Bridge::from_config(config)
    })
}
