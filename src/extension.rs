//! Named capabilities attached to a frame after it is built.
//!
//! Extensions live in a side table keyed by name; they are never merged into
//! the frame itself. Frames derived from an extended frame start with an
//! empty table.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::frame::DataFrame;

/// A capability attached to one [`DataFrame`] instance.
pub trait Extension: Any + fmt::Debug + Send + Sync {
    /// Lookup key in the frame's extension table.
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Builds an extension for a fully constructed frame.
pub type ExtensionFactory = fn(&DataFrame) -> Arc<dyn Extension>;

/// Name-keyed extension table.
#[derive(Clone, Default)]
pub struct Extensions {
    by_name: BTreeMap<String, Arc<dyn Extension>>,
}

impl Extensions {
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Extension>> {
        self.by_name.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Insert, replacing any extension registered under the same name.
    pub(crate) fn insert(&mut self, extension: Arc<dyn Extension>) {
        self.by_name.insert(extension.name().to_string(), extension);
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_name.keys()).finish()
    }
}

impl DataFrame {
    /// Attach extensions built by `factories`.
    ///
    /// Every factory sees the same finished frame (without the extensions
    /// being attached in this call).
    pub fn with_extensions(self, factories: &[ExtensionFactory]) -> DataFrame {
        let built: Vec<_> = factories.iter().map(|factory| factory(&self)).collect();
        let mut frame = self;
        for extension in built {
            frame.extensions.insert(extension);
        }
        frame
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extension(&self, name: &str) -> Option<&Arc<dyn Extension>> {
        self.extensions.get(name)
    }

    /// Typed lookup; `None` when the name is unknown or the type differs.
    pub fn extension_as<T: Extension>(&self, name: &str) -> Option<&T> {
        self.extension(name)?.as_any().downcast_ref::<T>()
    }
}
