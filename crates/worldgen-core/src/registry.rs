use std::hash::BuildHasherDefault;

use hashbrown::HashMap;
use rustc_hash::FxHasher;

use crate::Generator;

/// A set of generators, looked up by name.
#[derive(Default)]
pub struct Registry {
    generators: HashMap<String, Box<dyn Generator>, BuildHasherDefault<FxHasher>>,
}

impl Registry {
    /// Creates an empty [`Registry`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generator under its name.
    ///
    /// Returns the generator previously registered under that name, if any.
    pub fn register(&mut self, generator: Box<dyn Generator>) -> Option<Box<dyn Generator>> {
        self.generators
            .insert(generator.name().to_owned(), generator)
    }

    /// Returns whether a generator named `name` is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Returns the generator named `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|g| &**g)
    }

    /// Returns the generator named `name`.
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Generator + 'static)> {
        self.generators.get_mut(name).map(|g| &mut **g)
    }

    /// Resets the configuration of every registered generator.
    pub fn reset(&mut self) {
        for generator in self.generators.values_mut() {
            generator.reset();
        }
    }

    /// Returns the names of the registered generators, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered generators.
    #[inline]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns whether no generator is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
