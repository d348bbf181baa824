use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// The family a handle belongs to. Each family numbers its handles
/// independently and prefixes its scheduler names differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Force,
    ExternalForce,
    Analyzer,
}

impl Family {
    pub const fn prefix(self) -> &'static str {
        match self {
            Family::Force => "force",
            Family::ExternalForce => "external_force",
            Family::Analyzer => "analyzer",
        }
    }
}

/// Identity of a live handle. Its `Display` form is the name the handle is
/// registered under in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId {
    family: Family,
    index: u64,
}

impl HandleId {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn index(&self) -> u64 {
        self.index
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.prefix(), self.index)
    }
}

/// Issues strictly increasing identities per family. Owned by a simulation
/// context, so independent contexts never share a counter.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: BTreeMap<Family, u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, family: Family) -> HandleId {
        let counter = self.next.entry(family).or_insert(0);
        let index = *counter;
        *counter += 1;
        HandleId { family, index }
    }
}

/// A typed key to a handle owned by a
/// [`SimulationContext`](crate::core::context::SimulationContext).
pub struct Handle<T> {
    id: HandleId,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(id: HandleId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl<T> From<Handle<T>> for HandleId {
    fn from(handle: Handle<T>) -> Self {
        handle.id
    }
}
