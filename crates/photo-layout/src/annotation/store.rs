use super::{Annotation, AnnotationPatch, NewAnnotation};
use crate::geometry::Space;
use crate::types::*;

/// A mutation recorded by [`AnnotationStore`], for renderers that keep their
/// own id-to-element map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationChange {
    Added(AnnotationId),
    Updated(AnnotationId),
    Removed(AnnotationId),
}

/// The annotations of one photo during an edit session
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStore<S: Space> {
    items: Vec<Annotation<S>>,
    changes: Vec<AnnotationChange>,
}

impl<S: Space> Default for AnnotationStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Space> AnnotationStore<S> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Wrap an existing list. Loading does not count as a change.
    pub fn from_annotations(items: Vec<Annotation<S>>) -> Self {
        Self {
            items,
            changes: Vec::new(),
        }
    }

    /// Insert a new annotation under a fresh id and return it
    pub fn add(&mut self, new: NewAnnotation<S>) -> &Annotation<S> {
        let annotation = new.build();
        log::debug!("Added {} annotation {}", S::NAME, annotation.id);
        self.changes.push(AnnotationChange::Added(annotation.id.clone()));
        self.items.push(annotation);
        let last = self.items.len() - 1;
        &self.items[last]
    }

    /// Merge `patch` into the annotation with `id`
    pub fn update(&mut self, id: &AnnotationId, patch: AnnotationPatch<S>) -> Result<&Annotation<S>> {
        let index = self.position(id).ok_or_else(|| LayoutError::NotFound {
            kind: "Annotation",
            id: id.to_string(),
        })?;
        if !patch.is_empty() {
            patch.apply(&mut self.items[index]);
            self.changes.push(AnnotationChange::Updated(id.clone()));
        }
        Ok(&self.items[index])
    }

    /// Delete an annotation. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation<S>> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.changes.push(AnnotationChange::Removed(removed.id.clone()));
        Some(removed)
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation<S>> {
        self.items.iter().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.position(id).is_some()
    }

    /// Annotations in insertion order
    pub fn list(&self) -> &[Annotation<S>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drain the change log accumulated since the last call
    pub fn take_changes(&mut self) -> Vec<AnnotationChange> {
        std::mem::take(&mut self.changes)
    }

    /// Rewrite every annotation in place without logging changes
    pub(crate) fn rescale_all(&mut self, mut f: impl FnMut(&mut Annotation<S>)) {
        self.items.iter_mut().for_each(&mut f);
    }

    pub fn into_annotations(self) -> Vec<Annotation<S>> {
        self.items
    }

    fn position(&self, id: &AnnotationId) -> Option<usize> {
        self.items.iter().position(|a| &a.id == id)
    }
}
