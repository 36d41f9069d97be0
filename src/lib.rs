//! Streams a procedurally generated city around a moving observer.
//!
//! The world is divided into square chunks. A [`ChunkManager`] keeps the chunks around the
//! observer loaded, generating each of them with the generators of a [`Registry`] and handing
//! the generated objects to a [`RenderBackend`] and a [`PhysicsBackend`].
//!
//! [`Registry`]: sprawl_worldgen_core::Registry
//! [`RenderBackend`]: backend::RenderBackend
//! [`PhysicsBackend`]: backend::PhysicsBackend

pub mod backend;
pub mod config;

mod error;
pub use error::*;

mod world;
pub use world::*;

pub use sprawl_worldgen_std::standard_registry;
