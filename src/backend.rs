//! The collaborators that turn generated content into renderable and physical resources.
//!
//! The chunk manager never looks inside the resources it creates. It only keeps the handles
//! returned by the backends and hands them back when a chunk is unloaded.

use std::hash::BuildHasherDefault;
use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::Mutex;
use rustc_hash::FxHasher;

use sprawl_core::{Aabb, PhysicsHandle, PlacedObject, RenderHandle};

use crate::error::ResourceError;

/// Creates renderable resources for placed objects.
pub trait RenderBackend {
    /// Creates the renderable resource of `object`.
    fn create(&mut self, object: &PlacedObject) -> Result<RenderHandle, ResourceError>;

    /// Releases a resource previously returned by [`create`](RenderBackend::create).
    fn dispose(&mut self, handle: RenderHandle) -> Result<(), ResourceError>;
}

/// The parameters of a static physics body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBody {
    /// The mass of the body. Generated content is always static, with a mass of zero.
    pub mass: f32,
    /// The footprint of the body.
    pub bbox: Aabb,
    /// The height of the base of the body.
    pub elevation: f32,
}

impl StaticBody {
    /// Describes the static body of `object`.
    pub fn of(object: &PlacedObject) -> Self {
        Self {
            mass: 0.0,
            bbox: object.bbox(),
            elevation: object.elevation,
        }
    }
}

/// Creates physics bodies for renderable resources.
pub trait PhysicsBackend {
    /// Creates a static body attached to the renderable resource `render`.
    fn create(
        &mut self,
        render: RenderHandle,
        body: &StaticBody,
    ) -> Result<PhysicsHandle, ResourceError>;

    /// Releases a body previously returned by [`create`](PhysicsBackend::create).
    fn dispose(&mut self, handle: PhysicsHandle) -> Result<(), ResourceError>;
}

/// The handle registry shared by the headless backends.
#[derive(Default)]
struct Handles {
    next: u64,
    live: HashSet<u64, BuildHasherDefault<FxHasher>>,
    fail_create: bool,
    fail_dispose: bool,
}

impl Handles {
    fn create(&mut self, backend: &'static str) -> Result<u64, ResourceError> {
        if self.fail_create {
            return Err(ResourceError::CreationFailed {
                backend,
                message: "creation failure injected".into(),
            });
        }
        self.next += 1;
        self.live.insert(self.next);
        Ok(self.next)
    }

    fn dispose(&mut self, backend: &'static str, handle: u64) -> Result<(), ResourceError> {
        if self.fail_dispose {
            return Err(ResourceError::ReleaseFailed {
                backend,
                handle,
                message: "release failure injected".into(),
            });
        }
        if self.live.remove(&handle) {
            Ok(())
        } else {
            Err(ResourceError::UnknownHandle { backend, handle })
        }
    }
}

/// Generates the headless backend types. Both are cheap to clone: clones share the same
/// handle registry, which lets the caller observe a backend owned by the manager.
macro_rules! headless_backend {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Clone, Default)]
        pub struct $name(Arc<Mutex<Handles>>);

        impl $name {
            /// Creates a new backend with no live handle.
            pub fn new() -> Self {
                Self::default()
            }

            /// Returns the number of handles that were created and not released yet.
            pub fn live_count(&self) -> usize {
                self.0.lock().live.len()
            }

            /// Returns the total number of handles created so far.
            pub fn created_count(&self) -> u64 {
                self.0.lock().next
            }

            /// Makes every subsequent creation fail.
            pub fn fail_creation(&self, yes: bool) {
                self.0.lock().fail_create = yes;
            }

            /// Makes every subsequent release fail.
            pub fn fail_disposal(&self, yes: bool) {
                self.0.lock().fail_dispose = yes;
            }

            const LABEL: &'static str = $label;
        }
    };
}

headless_backend!(
    /// A [`RenderBackend`] that renders nothing and only keeps track of its handles.
    HeadlessRenderer,
    "headless renderer"
);

headless_backend!(
    /// A [`PhysicsBackend`] that simulates nothing and only keeps track of its handles.
    HeadlessPhysics,
    "headless physics"
);

impl RenderBackend for HeadlessRenderer {
    fn create(&mut self, _object: &PlacedObject) -> Result<RenderHandle, ResourceError> {
        self.0.lock().create(Self::LABEL).map(RenderHandle)
    }

    fn dispose(&mut self, handle: RenderHandle) -> Result<(), ResourceError> {
        self.0.lock().dispose(Self::LABEL, handle.0)
    }
}

impl PhysicsBackend for HeadlessPhysics {
    fn create(
        &mut self,
        _render: RenderHandle,
        _body: &StaticBody,
    ) -> Result<PhysicsHandle, ResourceError> {
        self.0.lock().create(Self::LABEL).map(PhysicsHandle)
    }

    fn dispose(&mut self, handle: PhysicsHandle) -> Result<(), ResourceError> {
        self.0.lock().dispose(Self::LABEL, handle.0)
    }
}
