//! Scoped resource port
//!
//! Tools that own external handles (files, connections) expose them through
//! a [`ResourceLifecycle`]. Release is idempotent and guarded by an async
//! mutex so concurrent disposal attempts cannot both reach the handle.
//! Managed state (buffers, caches) is released before unmanaged handles,
//! and the unmanaged step runs even when the managed step fails.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// Failure while releasing a resource.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error("Managed release failed ({managed}); unmanaged release failed ({unmanaged})")]
    Both {
        managed: Box<ResourceError>,
        unmanaged: Box<ResourceError>,
    },
}

/// The two release steps of an owned handle.
#[async_trait]
pub trait ScopedResource: Send + Sync {
    /// Flush buffers, drop caches.
    async fn release_managed(&self) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Close the underlying handle.
    async fn release_unmanaged(&self) -> Result<(), ResourceError>;
}

#[async_trait]
impl<T: ScopedResource + ?Sized> ScopedResource for std::sync::Arc<T> {
    async fn release_managed(&self) -> Result<(), ResourceError> {
        (**self).release_managed().await
    }

    async fn release_unmanaged(&self) -> Result<(), ResourceError> {
        (**self).release_unmanaged().await
    }
}

/// When a tool gives its resources back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleasePolicy {
    /// Release right after any failed invocation
    pub release_on_failure: bool,
}

impl ReleasePolicy {
    pub fn release_on_failure() -> Self {
        Self {
            release_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    /// An earlier call already released; nothing was touched
    AlreadyReleased,
}

/// Idempotent, mutex-guarded release of a [`ScopedResource`].
pub struct ResourceLifecycle {
    name: String,
    resource: Box<dyn ScopedResource>,
    policy: ReleasePolicy,
    guard: Mutex<bool>,
    released: AtomicBool,
}

impl ResourceLifecycle {
    pub fn new(name: impl Into<String>, resource: impl ScopedResource + 'static) -> Self {
        Self {
            name: name.into(),
            resource: Box::new(resource),
            policy: ReleasePolicy::default(),
            guard: Mutex::new(false),
            released: AtomicBool::new(false),
        }
    }

    pub fn with_policy(mut self, policy: ReleasePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Release managed then unmanaged state, once.
    ///
    /// The resource counts as released as soon as the first call gets the
    /// guard, even if a step fails: a half-closed handle is never retried.
    pub async fn release(&self) -> Result<ReleaseOutcome, ResourceError> {
        let mut released = self.guard.lock().await;
        if *released {
            debug!(resource = %self.name, "Resource already released");
            return Ok(ReleaseOutcome::AlreadyReleased);
        }
        *released = true;
        self.released.store(true, Ordering::Release);

        let managed = self.resource.release_managed().await;
        if let Err(e) = &managed {
            warn!(resource = %self.name, error = %e, "Managed release failed; releasing unmanaged state anyway");
        }
        let unmanaged = self.resource.release_unmanaged().await;

        match (managed, unmanaged) {
            (Ok(()), Ok(())) => {
                debug!(resource = %self.name, "Resource released");
                Ok(ReleaseOutcome::Released)
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(managed), Err(unmanaged)) => Err(ResourceError::Both {
                managed: Box::new(managed),
                unmanaged: Box::new(unmanaged),
            }),
        }
    }
}

impl Drop for ResourceLifecycle {
    fn drop(&mut self) {
        if !self.released.load(Ordering::Acquire) {
            error!(
                resource = %self.name,
                "Resource dropped without being released; the host must release tools at shutdown"
            );
        }
    }
}

impl std::fmt::Debug for ResourceLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLifecycle")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;

    #[derive(Clone, Default)]
    struct Recorder {
        steps: Arc<StdMutex<Vec<&'static str>>>,
        fail_managed: bool,
    }

    #[async_trait]
    impl ScopedResource for Recorder {
        async fn release_managed(&self) -> Result<(), ResourceError> {
            self.steps.lock().unwrap().push("managed");
            if self.fail_managed {
                return Err(ResourceError::Other("flush failed".to_string()));
            }
            Ok(())
        }

        async fn release_unmanaged(&self) -> Result<(), ResourceError> {
            self.steps.lock().unwrap().push("unmanaged");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let recorder = Recorder::default();
        let lifecycle = ResourceLifecycle::new("handle", recorder.clone());

        assert_eq!(lifecycle.release().await.unwrap(), ReleaseOutcome::Released);
        assert_eq!(lifecycle.release().await.unwrap(), ReleaseOutcome::AlreadyReleased);
        assert!(lifecycle.is_released());
        assert_eq!(*recorder.steps.lock().unwrap(), vec!["managed", "unmanaged"]);
    }

    #[tokio::test]
    async fn test_concurrent_release_touches_handle_once() {
        let recorder = Recorder::default();
        let lifecycle = Arc::new(ResourceLifecycle::new("handle", recorder.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lifecycle = Arc::clone(&lifecycle);
                tokio::spawn(async move { lifecycle.release().await.unwrap() })
            })
            .collect();

        let mut released = 0;
        for handle in handles {
            if handle.await.unwrap() == ReleaseOutcome::Released {
                released += 1;
            }
        }
        assert_eq!(released, 1);
        assert_eq!(recorder.steps.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_managed_failure_still_releases_unmanaged() {
        let recorder = Recorder {
            fail_managed: true,
            ..Recorder::default()
        };
        let lifecycle = ResourceLifecycle::new("handle", recorder.clone());

        let err = lifecycle.release().await.unwrap_err();
        assert!(err.to_string().contains("flush failed"));
        assert_eq!(*recorder.steps.lock().unwrap(), vec!["managed", "unmanaged"]);
        assert!(lifecycle.is_released());

        // Never retried
        assert_eq!(lifecycle.release().await.unwrap(), ReleaseOutcome::AlreadyReleased);
    }

    #[test]
    fn test_default_policy_keeps_resources_alive() {
        assert!(!ReleasePolicy::default().release_on_failure);
        assert!(ReleasePolicy::release_on_failure().release_on_failure);
    }
}
