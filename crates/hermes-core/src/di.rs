//! Dependency injection container.
//!
//! Services are registered at application startup, either one by one or
//! through [`Module`]s, and later resolved by type via [`Inject<T>`].
//!
//! # Example
//!
//! ```rust
//! use hermes_core::di::{Container, Inject, Module};
//! use std::sync::Arc;
//!
//! struct ImageRepository {
//!     bucket: String,
//! }
//!
//! struct ImagesModule;
//!
//! impl Module for ImagesModule {
//!     fn configure(&self, container: &mut Container) {
//!         container.register(Arc::new(ImageRepository {
//!             bucket: "images".to_string(),
//!         }));
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.install(&ImagesModule);
//!
//! let repo = Inject::<ImageRepository>::from_container(&container).unwrap();
//! assert_eq!(repo.bucket, "images");
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

/// Error when a dependency cannot be resolved.
#[derive(Debug, Clone)]
pub struct InjectionError {
    /// The type name that could not be resolved.
    pub type_name: &'static str,
    /// The reason for the failure.
    pub reason: String,
}

impl fmt::Display for InjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to inject {}: {}", self.type_name, self.reason)
    }
}

impl std::error::Error for InjectionError {}

impl InjectionError {
    /// Creates an injection error for a service that was never registered.
    pub fn not_registered<T>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            reason: "service not registered".to_string(),
        }
    }

    /// Creates an injection error with a custom reason.
    pub fn custom<T>(reason: impl Into<String>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }
}

/// A unit of service bindings installed into a [`Container`].
pub trait Module {
    /// Registers this module's services.
    fn configure(&self, container: &mut Container);
}

/// A dependency injection container.
///
/// Stores `Arc`-wrapped services keyed by their type. Registering a type a
/// second time replaces the earlier binding.
#[derive(Default)]
pub struct Container {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Registers a service.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        if self.services.insert(TypeId::of::<T>(), service).is_some() {
            debug!(service = std::any::type_name::<T>(), "replaced service binding");
        }
    }

    /// Lets `module` register its services into this container.
    pub fn install(&mut self, module: &dyn Module) -> &mut Self {
        let before = self.services.len();
        module.configure(self);
        debug!(
            added = self.services.len().saturating_sub(before),
            total = self.services.len(),
            "installed module"
        );
        self
    }

    /// Resolves a service, or `None` if it is not registered.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| s.clone().downcast::<T>().ok())
    }

    /// Resolves a service or returns an error.
    ///
    /// # Errors
    ///
    /// Returns `InjectionError` if the service is not registered.
    pub fn resolve_required<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.resolve().ok_or_else(InjectionError::not_registered::<T>)
    }

    /// Checks if a service is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("service_count", &self.services.len())
            .finish()
    }
}

/// A resolved dependency.
#[derive(Clone)]
pub struct Inject<T>(pub Arc<T>);

impl<T> Inject<T> {
    /// Creates a new `Inject` wrapper.
    pub fn new(inner: Arc<T>) -> Self {
        Self(inner)
    }

    /// Returns a reference to the inner service.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Converts into the inner `Arc`.
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Inject").field(&self.0).finish()
    }
}

impl<T: Send + Sync + 'static> Inject<T> {
    /// Resolves the service from a container.
    ///
    /// # Errors
    ///
    /// Returns `InjectionError` if the service is not registered.
    pub fn from_container(container: &Container) -> Result<Self, InjectionError> {
        container.resolve_required::<T>().map(Inject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Mailer {
        sender: String,
    }

    impl Mailer {
        fn new(sender: &str) -> Self {
            Self {
                sender: sender.to_string(),
            }
        }
    }

    struct MailModule(&'static str);

    impl Module for MailModule {
        fn configure(&self, container: &mut Container) {
            container.register(Arc::new(Mailer::new(self.0)));
        }
    }

    #[test]
    fn test_container_new() {
        let container = Container::new();
        assert!(container.is_empty());
        assert_eq!(container.len(), 0);
    }

    #[test]
    fn test_register_and_resolve() {
        let mut container = Container::new();
        container.register(Arc::new(Mailer::new("noreply@example.com")));

        let mailer: Arc<Mailer> = container.resolve().unwrap();
        assert_eq!(mailer.sender, "noreply@example.com");
    }

    #[test]
    fn test_resolve_missing() {
        let container = Container::new();
        assert!(container.resolve::<Mailer>().is_none());
    }

    #[test]
    fn test_resolve_required_missing() {
        let container = Container::new();
        let err = container.resolve_required::<Mailer>().unwrap_err();

        assert!(err.to_string().contains("Mailer"));
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_register_replaces_binding() {
        let mut container = Container::new();
        container.register(Arc::new(Mailer::new("first")));
        container.register(Arc::new(Mailer::new("second")));

        assert_eq!(container.len(), 1);
        assert_eq!(container.resolve::<Mailer>().unwrap().sender, "second");
    }

    #[test]
    fn test_install_module() {
        let mut container = Container::new();
        container.install(&MailModule("ops@example.com"));

        assert!(container.contains::<Mailer>());
        let mailer = Inject::<Mailer>::from_container(&container).unwrap();
        assert_eq!(mailer.sender, "ops@example.com");
    }

    #[test]
    fn test_install_chains() {
        struct Clock;
        struct ClockModule;

        impl Module for ClockModule {
            fn configure(&self, container: &mut Container) {
                container.register(Arc::new(Clock));
            }
        }

        let mut container = Container::new();
        container.install(&MailModule("a")).install(&ClockModule);

        assert_eq!(container.len(), 2);
        assert!(container.contains::<Clock>());
    }

    #[test]
    fn test_inject_deref_and_into_inner() {
        let inject = Inject::new(Arc::new(Mailer::new("deref")));
        assert_eq!(inject.sender, "deref");
        assert_eq!(inject.inner().sender, "deref");
        assert_eq!(inject.into_inner().sender, "deref");
    }

    #[test]
    fn test_inject_from_container_missing() {
        let container = Container::new();
        assert!(Inject::<Mailer>::from_container(&container).is_err());
    }

    #[test]
    fn test_container_debug() {
        let mut container = Container::new();
        container.register(Arc::new(Mailer::new("debug")));

        let debug = format!("{container:?}");
        assert!(debug.contains("service_count"));
    }

    #[test]
    fn test_injection_error_custom() {
        let err = InjectionError::custom::<Mailer>("pool exhausted");
        assert_eq!(err.reason, "pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
