//! Resource storage and management.
//!
//! A [`Resources`] container holds one value per type: the host's scene, the
//! configuration store, the deferred scheduler. Hooks and deferred actions
//! receive `&Resources` and borrow what they need through RAII guards.
//!
//! Each entry sits behind its own lock, so a hook can hold the scene mutably
//! while it reads the configuration. Borrowing the same entry twice in
//! conflicting ways is reported as [`ResourceError::BorrowConflict`] instead
//! of blocking.

use core::any::{Any, TypeId};
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A value that can be stored in [`Resources`].
///
/// Any `Send + Sync + 'static` type is a resource.
pub trait Resource: Send + Sync + 'static {
    /// Returns the type name for debugging purposes.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: Send + Sync + 'static> Resource for T {}

/// Unique identifier for a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(TypeId);

impl ResourceId {
    /// Creates a `ResourceId` for the given type.
    #[must_use]
    pub fn of<T: Resource>() -> Self {
        Self(TypeId::of::<T>())
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.0
    }
}

/// Errors that can occur during resource access.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The requested resource type was not found in the container.
    #[error("resource not found: {0}")]
    NotFound(&'static str),

    /// The resource is currently borrowed in a conflicting way.
    #[error("resource already borrowed: {0}")]
    BorrowConflict(&'static str),
}

struct ResourceEntry {
    data: RwLock<Box<dyn Any + Send + Sync>>,
}

impl ResourceEntry {
    fn new<T: Resource>(resource: T) -> Self {
        Self {
            data: RwLock::new(Box::new(resource)),
        }
    }

    fn into_inner(self) -> Box<dyn Any + Send + Sync> {
        self.data.into_inner()
    }
}

/// Container for storing and managing session resources.
///
/// # Example
///
/// ```
/// use orbscoop_system::resource::Resources;
///
/// struct FrameCount(u64);
///
/// let mut resources = Resources::new();
/// resources.insert(FrameCount(0));
///
/// resources.get_mut::<FrameCount>().unwrap().0 += 1;
/// assert_eq!(resources.get::<FrameCount>().unwrap().0, 1);
/// ```
#[derive(Default)]
pub struct Resources {
    storage: HashMap<ResourceId, ResourceEntry>,
}

impl Resources {
    /// Creates a new empty resource container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Inserts a resource, returning the previous value of that type if any.
    pub fn insert<T: Resource>(&mut self, resource: T) -> Option<T> {
        self.storage
            .insert(ResourceId::of::<T>(), ResourceEntry::new(resource))
            .and_then(|old| old.into_inner().downcast::<T>().ok().map(|boxed| *boxed))
    }

    /// Returns `true` if a resource of type `T` exists.
    #[must_use]
    pub fn contains<T: Resource>(&self) -> bool {
        self.storage.contains_key(&ResourceId::of::<T>())
    }

    /// Gets shared access to a resource.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if the resource type is not registered
    /// - [`ResourceError::BorrowConflict`] if the resource is mutably borrowed
    pub fn get<T: Resource>(&self) -> Result<ResourceRef<'_, T>, ResourceError> {
        let type_name = core::any::type_name::<T>();
        let entry = self
            .storage
            .get(&ResourceId::of::<T>())
            .ok_or(ResourceError::NotFound(type_name))?;
        let guard = entry
            .data
            .try_read()
            .ok_or(ResourceError::BorrowConflict(type_name))?;

        Ok(ResourceRef {
            guard,
            _marker: core::marker::PhantomData,
        })
    }

    /// Gets exclusive access to a resource.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if the resource type is not registered
    /// - [`ResourceError::BorrowConflict`] if the resource is already borrowed
    pub fn get_mut<T: Resource>(&self) -> Result<ResourceRefMut<'_, T>, ResourceError> {
        let type_name = core::any::type_name::<T>();
        let entry = self
            .storage
            .get(&ResourceId::of::<T>())
            .ok_or(ResourceError::NotFound(type_name))?;
        let guard = entry
            .data
            .try_write()
            .ok_or(ResourceError::BorrowConflict(type_name))?;

        Ok(ResourceRefMut {
            guard,
            _marker: core::marker::PhantomData,
        })
    }

    /// Removes a resource from the container and returns it.
    pub fn remove<T: Resource>(&mut self) -> Option<T> {
        self.storage
            .remove(&ResourceId::of::<T>())
            .and_then(|entry| entry.into_inner().downcast::<T>().ok().map(|boxed| *boxed))
    }

    /// Returns the number of resources stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if no resources are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

/// RAII guard for shared resource access.
pub struct ResourceRef<'a, T: Resource> {
    guard: RwLockReadGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: core::marker::PhantomData<&'a T>,
}

impl<T: Resource> core::ops::Deref for ResourceRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // The entry was keyed by ResourceId::of::<T>(), so the downcast holds.
        self.guard
            .downcast_ref::<T>()
            .expect("resource type mismatch (this is a bug)")
    }
}

/// RAII guard for exclusive resource access.
pub struct ResourceRefMut<'a, T: Resource> {
    guard: RwLockWriteGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: core::marker::PhantomData<&'a mut T>,
}

impl<T: Resource> core::ops::Deref for ResourceRefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.guard
            .downcast_ref::<T>()
            .expect("resource type mismatch (this is a bug)")
    }
}

impl<T: Resource> core::ops::DerefMut for ResourceRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard
            .downcast_mut::<T>()
            .expect("resource type mismatch (this is a bug)")
    }
}
