// Ordered, owning container shared by every model list.

use std::collections::HashMap;
use std::ops::Index;

use tracing::debug;

/// A model that can live in a [`ModelList`].
pub trait Model {
    /// Key identifying the model within a list. Models without a key are
    /// never deduplicated.
    fn key(&self) -> Option<&str>;
}

/// Insertion-ordered list of models with a lookup index over their keys.
///
/// Adding a model whose key is already present replaces the stored model in
/// place, so each key appears at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelList<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for ModelList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> ModelList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Projects every model through `f`, in list order.
    pub fn map<R, F>(&self, f: F) -> Vec<R>
    where
        F: FnMut(&T) -> R,
    {
        self.items.iter().map(f).collect()
    }
}

impl<T: Model> ModelList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `models` in order. Returns `self` so calls can be chained.
    pub fn add<I>(&mut self, models: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        for model in models {
            self.push(model);
        }
        self
    }

    pub fn push(&mut self, model: T) {
        let Some(key) = model.key().map(str::to_owned) else {
            self.items.push(model);
            return;
        };

        match self.index.get(&key) {
            Some(&position) => {
                debug!(key = %key, position, "Replacing model with an existing key");
                self.items[position] = model;
            }
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(model);
            }
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.index.get(id).and_then(|&i| self.items.get(i))
    }

    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut T> {
        match self.index.get(id) {
            Some(&i) => self.items.get_mut(i),
            None => None,
        }
    }

    /// Keys of the keyed models, in list order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().filter_map(Model::key).collect()
    }
}

impl<T> Index<usize> for ModelList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a ModelList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Model> FromIterator<T> for ModelList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add(iter);
        list
    }
}
