//! The structured-reader capability the decoders are written against.
//!
//! Decoders only need three things from a document: attribute lookup on the
//! current element, iteration over its child elements with their tag names,
//! and the element's character data. [`Element`] captures exactly that, so
//! the same readers work over any tree that can provide it. The crate ships
//! an implementation for [`roxmltree::Node`].

use std::borrow::Cow;

/// A read-only view of one element in a structured document.
///
/// Implementors are cheap handles (`Copy`) into a document owned elsewhere.
pub trait Element: Copy {
    /// Iterator over direct child elements, in document order.
    type Children: Iterator<Item = Self>;

    /// Tag name of this element (local name, no namespace).
    fn tag(&self) -> &str;

    /// Raw value of the named attribute, if present.
    fn attr(&self, name: &str) -> Option<&str>;

    /// Direct child elements. Text, comments and processing instructions are
    /// not yielded.
    fn child_elements(&self) -> Self::Children;

    /// Concatenated character data of the direct text children.
    /// Empty when the element has no text.
    fn text_content(&self) -> Cow<'_, str>;
}

// ============================================================================
// roxmltree backend
// ============================================================================

/// Child-element iterator over a [`roxmltree::Node`].
pub struct XmlChildren<'a, 'input> {
    inner: roxmltree::Children<'a, 'input>,
}

impl<'a, 'input> Iterator for XmlChildren<'a, 'input> {
    type Item = roxmltree::Node<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find(|n| n.is_element())
    }
}

impl<'a, 'input> Element for roxmltree::Node<'a, 'input> {
    type Children = XmlChildren<'a, 'input>;

    #[inline]
    fn tag(&self) -> &str {
        self.tag_name().name()
    }

    #[inline]
    fn attr(&self, name: &str) -> Option<&str> {
        self.attribute(name)
    }

    fn child_elements(&self) -> Self::Children {
        XmlChildren { inner: self.children() }
    }

    fn text_content(&self) -> Cow<'_, str> {
        let mut texts = self
            .children()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text());

        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => Cow::Borrowed(only),
            (Some(first), Some(second)) => {
                let mut joined = String::from(first);
                joined.push_str(second);
                texts.for_each(|t| joined.push_str(t));
                Cow::Owned(joined)
            }
        }
    }
}
