//! Shape registry.
//!
//! Maps a [`ShapeId`] to its declarations. Built once and then shared
//! read-only; every nested target is resolved up front so a missing shape is
//! reported at build time instead of in the middle of a validation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::shape::{Shape, ShapeId};

// ============================================================================
// METADATA SOURCE
// ============================================================================

/// Where the engine looks up declarations.
///
/// [`Registry`] is the in-memory implementation. Other sources (generated
/// tables, remote catalogues) can implement this trait; a source that cannot
/// answer at all should return [`Error::MetadataUnavailable`].
pub trait MetadataSource: Send + Sync {
    /// Returns the declarations for `shape`.
    fn resolve(&self, shape: &ShapeId) -> Result<Arc<Shape>>;

    /// Returns `true` when records of shape `actual` may stand in for `target`.
    ///
    /// Conformance is transitive: `actual` conforms when `target` is reachable
    /// through any chain of declared `conforms_to` links. Cycles are tolerated.
    fn conforms(&self, actual: &ShapeId, target: &ShapeId) -> Result<bool> {
        if actual == target {
            return Ok(true);
        }
        let mut visited = HashSet::from([actual.clone()]);
        let mut queue = VecDeque::from([actual.clone()]);
        while let Some(current) = queue.pop_front() {
            let shape = self.resolve(&current)?;
            for parent in shape.conforms_to() {
                if parent == target {
                    return Ok(true);
                }
                if visited.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }
        Ok(false)
    }
}

impl<S: MetadataSource + ?Sized> MetadataSource for Arc<S> {
    fn resolve(&self, shape: &ShapeId) -> Result<Arc<Shape>> {
        (**self).resolve(shape)
    }

    fn conforms(&self, actual: &ShapeId, target: &ShapeId) -> Result<bool> {
        (**self).conforms(actual, target)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Immutable in-memory [`MetadataSource`].
#[derive(Clone, Default)]
pub struct Registry {
    shapes: HashMap<ShapeId, Arc<Shape>>,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks a shape up without going through [`MetadataSource`].
    pub fn get(&self, shape: &ShapeId) -> Option<&Arc<Shape>> {
        self.shapes.get(shape)
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if no shapes are registered.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl MetadataSource for Registry {
    fn resolve(&self, shape: &ShapeId) -> Result<Arc<Shape>> {
        self.shapes
            .get(shape)
            .cloned()
            .ok_or_else(|| Error::UnknownShape {
                shape: shape.clone(),
            })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.shapes.keys().map(ShapeId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("Registry").field("shapes", &ids).finish()
    }
}

/// Collects shapes and checks cross-references on [`build`](Self::build).
#[derive(Debug, Default)]
#[must_use = "builder methods must be chained or built"]
pub struct RegistryBuilder {
    shapes: Vec<Shape>,
}

impl RegistryBuilder {
    /// Adds a shape.
    pub fn register(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Validates the collected shapes and freezes them.
    ///
    /// Fails on a duplicate shape id or on a nested target / conformance that
    /// names an unregistered shape. Malformed date ranges are only logged; see
    /// [`Shape::lint`].
    pub fn build(self) -> Result<Registry> {
        let mut shapes = HashMap::with_capacity(self.shapes.len());
        for shape in self.shapes {
            let id = shape.id().clone();
            if shapes.contains_key(&id) {
                return Err(Error::DuplicateShape { shape: id });
            }
            for diagnostic in shape.lint() {
                tracing::warn!(shape = %id, %diagnostic, "Malformed date range declaration");
            }
            shapes.insert(id, Arc::new(shape));
        }

        for shape in shapes.values() {
            for nested in shape.nesteds() {
                let target = nested.declaration.shape();
                if !shapes.contains_key(target) {
                    return Err(Error::UnresolvedTarget {
                        shape: shape.id().clone(),
                        attribute: nested.name.to_string(),
                        target: target.clone(),
                    });
                }
            }
            for target in shape.conforms_to() {
                if !shapes.contains_key(target) {
                    return Err(Error::UnresolvedTarget {
                        shape: shape.id().clone(),
                        attribute: String::new(),
                        target: target.clone(),
                    });
                }
            }
            tracing::debug!(
                shape = %shape.id(),
                starts = shape.starts().len(),
                ends = shape.ends().len(),
                nested = shape.nesteds().len(),
                constraints = shape.constraints().len(),
                "Registered shape"
            );
        }

        Ok(Registry { shapes })
    }
}
