use std::sync::Arc;

use crate::state::policy::ReclaimPolicy;
use crate::ws::hub::SessionRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(policy: ReclaimPolicy) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new(policy.allow_role_reclaim)),
        }
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(ReclaimPolicy::default())
    }
}
