//! Persistence context binding.
//!
//! Hermes does not manage entities itself. An application supplies a
//! [`PersistenceContext`] and [`PersistenceModule`] binds it into the
//! [`Container`] as a [`Persistence`] handle that services inject.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::info;

use crate::di::{Container, Module};

/// An application-supplied persistence context.
pub trait PersistenceContext: Send + Sync {
    /// Returns the name of the persistence unit this context serves.
    fn unit_name(&self) -> &str;

    /// Returns `true` while the context accepts work.
    fn is_open(&self) -> bool;

    /// Closes the context. Calling it on a closed context has no effect.
    fn close(&self);
}

/// Shared handle to the bound persistence context.
///
/// This is the type registered in the container; resolve it with
/// `Inject<Persistence>`.
#[derive(Clone)]
pub struct Persistence(Arc<dyn PersistenceContext>);

impl Persistence {
    /// Wraps a persistence context.
    pub fn new(context: Arc<dyn PersistenceContext>) -> Self {
        Self(context)
    }

    /// Returns the wrapped context.
    pub fn context(&self) -> &Arc<dyn PersistenceContext> {
        &self.0
    }
}

impl Deref for Persistence {
    type Target = dyn PersistenceContext;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("unit_name", &self.0.unit_name())
            .field("open", &self.0.is_open())
            .finish()
    }
}

/// Module binding a persistence context into the container.
///
/// # Example
///
/// ```rust
/// use hermes_core::di::{Container, Inject};
/// use hermes_core::persistence::{Persistence, PersistenceContext, PersistenceModule};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct InMemoryStore {
///     open: AtomicBool,
/// }
///
/// impl PersistenceContext for InMemoryStore {
///     fn unit_name(&self) -> &str {
///         "images"
///     }
///     fn is_open(&self) -> bool {
///         self.open.load(Ordering::SeqCst)
///     }
///     fn close(&self) {
///         self.open.store(false, Ordering::SeqCst);
///     }
/// }
///
/// let mut container = Container::new();
/// container.install(&PersistenceModule::new(InMemoryStore { open: AtomicBool::new(true) }));
///
/// let persistence = Inject::<Persistence>::from_container(&container).unwrap();
/// assert_eq!(persistence.unit_name(), "images");
/// ```
#[derive(Debug, Clone)]
pub struct PersistenceModule {
    persistence: Persistence,
}

impl PersistenceModule {
    /// Creates a module binding `context`.
    pub fn new(context: impl PersistenceContext + 'static) -> Self {
        Self::from_arc(Arc::new(context))
    }

    /// Creates a module binding an already shared context.
    pub fn from_arc(context: Arc<dyn PersistenceContext>) -> Self {
        Self {
            persistence: Persistence::new(context),
        }
    }
}

impl Module for PersistenceModule {
    fn configure(&self, container: &mut Container) {
        info!(unit = self.persistence.unit_name(), "binding persistence context");
        container.register(Arc::new(self.persistence.clone()));
    }
}
