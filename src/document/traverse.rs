//! Child-element traversal.
//!
//! The engine only drives iteration: it visits every direct child once, in
//! document order, and hands it to a caller-supplied dispatcher. Policies
//! such as "at most once" live in the dispatcher, backed by [`AtMostOnce`].

use tracing::trace;

use super::Element;
use crate::util::{Error, Result};

/// Visit each child element and dispatch on its tag.
///
/// The dispatcher is responsible for every tag, including unknown ones; it
/// should route those to [`skip`].
pub fn process_children<E: Element>(
    element: E,
    mut dispatch: impl FnMut(E, &str) -> Result<()>,
) -> Result<()> {
    for child in element.child_elements() {
        let tag = child.tag();
        dispatch(child, tag)?;
    }
    Ok(())
}

/// Visit each child element and collect the values produced by the
/// dispatcher. Children for which the dispatcher returns `None` are skipped.
pub fn collect_children<E: Element, T>(
    element: E,
    mut dispatch: impl FnMut(E, &str) -> Result<Option<T>>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for child in element.child_elements() {
        let tag = child.tag();
        if let Some(item) = dispatch(child, tag)? {
            items.push(item);
        }
    }
    Ok(items)
}

/// Read every child with the given tag into a list, skipping the rest.
pub fn read_list<E: Element, T>(
    element: E,
    tag: &str,
    mut read: impl FnMut(E) -> Result<T>,
) -> Result<Vec<T>> {
    collect_children(element, |child, child_tag| {
        if child_tag == tag {
            read(child).map(Some)
        } else {
            skip(child)?;
            Ok(None)
        }
    })
}

/// Ignore an element and its subtree.
#[inline]
pub fn skip<E: Element>(element: E) -> Result<()> {
    trace!(tag = element.tag(), "skipping unknown element");
    Ok(())
}

/// Slot for a section that may appear at most once under one parent.
///
/// The slot can start out holding a default (for instance class-derived
/// properties); only explicit assignments count towards the limit.
#[derive(Debug)]
pub struct AtMostOnce<T> {
    section: &'static str,
    value: Option<T>,
    assigned: u32,
}

impl<T> AtMostOnce<T> {
    /// Empty slot.
    pub fn new(section: &'static str) -> Self {
        Self { section, value: None, assigned: 0 }
    }

    /// Slot pre-filled with a default value that may still be assigned once.
    pub fn with_default(section: &'static str, value: T) -> Self {
        Self { section, value: Some(value), assigned: 0 }
    }

    /// Assign the slot. Fails with `DuplicateElement` on the second call.
    pub fn set(&mut self, value: T) -> Result<()> {
        self.update(|_| Ok(value))
    }

    /// Assign the slot from its current content.
    pub fn update(&mut self, f: impl FnOnce(Option<T>) -> Result<T>) -> Result<()> {
        if self.assigned > 0 {
            return Err(Error::DuplicateElement(self.section.to_string()));
        }
        self.assigned += 1;
        let value = f(self.value.take())?;
        self.value = Some(value);
        Ok(())
    }

    /// Whether an explicit assignment happened.
    pub fn is_assigned(&self) -> bool {
        self.assigned > 0
    }

    /// Take the value out.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}
