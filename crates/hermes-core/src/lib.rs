//! # Hermes Core
//!
//! Service wiring for the Hermes RPC server.
//!
//! - [`Container`] - Type-keyed registry of shared services
//! - [`Inject`] - Handle to a resolved service
//! - [`Module`] - A unit of bindings installed into the container
//! - [`PersistenceModule`] - Binds an application's [`PersistenceContext`]

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod di;
pub mod persistence;

pub use di::{Container, Inject, InjectionError, Module};
pub use persistence::{Persistence, PersistenceContext, PersistenceModule};
