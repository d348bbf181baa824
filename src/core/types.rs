use crate::error::{Error, Result};

/// Ordered set of particle type names. Index `i` is the type id stored per
/// particle and the slot index of per-type force parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleTypeRegistry {
    names: Vec<String>,
}

impl ParticleTypeRegistry {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for name in names {
            let name = name.into();
            if registry.index_of(&name).is_some() {
                return Err(Error::InvalidParticleData(format!(
                    "duplicate particle type '{name}'"
                )));
            }
            registry.names.push(name);
        }
        Ok(registry)
    }

    pub fn type_count(&self) -> usize {
        self.names.len()
    }

    pub fn name_by_index(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Anything that may or may not have a particle type registry yet.
/// `None` means the simulation has not been initialized.
pub trait TypeSource {
    fn type_registry(&self) -> Option<&ParticleTypeRegistry>;
}

impl TypeSource for ParticleTypeRegistry {
    fn type_registry(&self) -> Option<&ParticleTypeRegistry> {
        Some(self)
    }
}
