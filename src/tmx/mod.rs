//! TMX / TSX / TX document readers.
//!
//! [`TmxReader`] carries the injected collaborators (external tileset and
//! template resolvers, custom type lookup) and drives a single recursive
//! descent over a document. It holds no mutable state, so one reader can
//! decode many documents, from several threads at once.
//!
//! ## Example
//!
//! ```ignore
//! use tmx::TmxReader;
//!
//! let reader = TmxReader::new()
//!     .with_tileset_resolver(|source| load_tsx(source))
//!     .with_custom_types(registry);
//! let map = reader.read_map_str(&std::fs::read_to_string("level.tmx")?)?;
//! ```

mod data;
mod layer;
mod map;
mod object;
mod properties;
mod tileset;

use tracing::debug;

use crate::document::Element;
use crate::model::{CustomTypeDefinition, CustomTypeRegistry, Map, Properties, Template, Tileset};
use crate::util::{Error, Result};

/// Resolves an external tileset `source` to a fully formed tileset.
pub type TilesetResolver<'a> = Box<dyn Fn(&str) -> Result<Tileset> + Send + Sync + 'a>;

/// Resolves an object `template` path to a template.
pub type TemplateResolver<'a> = Box<dyn Fn(&str) -> Result<Template> + Send + Sync + 'a>;

/// Looks up a custom class or enum by name. Absence is not an error.
pub type CustomTypeResolver<'a> = Box<dyn Fn(&str) -> Option<CustomTypeDefinition> + Send + Sync + 'a>;

/// Decoder for TMX documents.
pub struct TmxReader<'a> {
    tileset_resolver: TilesetResolver<'a>,
    template_resolver: TemplateResolver<'a>,
    custom_type_resolver: CustomTypeResolver<'a>,
}

impl Default for TmxReader<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TmxReader<'a> {
    /// Reader without external resolvers: external tilesets and templates
    /// fail with `UnresolvedReference`, custom types are unknown.
    pub fn new() -> Self {
        Self {
            tileset_resolver: Box::new(|_: &str| Err(Error::other("no tileset resolver configured"))),
            template_resolver: Box::new(|_: &str| Err(Error::other("no template resolver configured"))),
            custom_type_resolver: Box::new(|_: &str| None),
        }
    }

    /// Set the external tileset resolver.
    pub fn with_tileset_resolver(
        mut self,
        resolver: impl Fn(&str) -> Result<Tileset> + Send + Sync + 'a,
    ) -> Self {
        self.tileset_resolver = Box::new(resolver);
        self
    }

    /// Set the template resolver.
    pub fn with_template_resolver(
        mut self,
        resolver: impl Fn(&str) -> Result<Template> + Send + Sync + 'a,
    ) -> Self {
        self.template_resolver = Box::new(resolver);
        self
    }

    /// Set the custom type lookup.
    pub fn with_custom_type_resolver(
        mut self,
        resolver: impl Fn(&str) -> Option<CustomTypeDefinition> + Send + Sync + 'a,
    ) -> Self {
        self.custom_type_resolver = Box::new(resolver);
        self
    }

    /// Use a registry as the custom type lookup.
    pub fn with_custom_types(self, registry: CustomTypeRegistry) -> Self {
        self.with_custom_type_resolver(move |name| registry.resolve(name).cloned())
    }

    // ========================================================================
    // String entry points
    // ========================================================================

    /// Decode a `.tmx` document.
    pub fn read_map_str(&self, xml: &str) -> Result<Map> {
        let doc = roxmltree::Document::parse(xml)?;
        self.read_map(doc.root_element())
    }

    /// Decode a standalone `.tsx` document.
    pub fn read_tileset_str(&self, xml: &str) -> Result<Tileset> {
        let doc = roxmltree::Document::parse(xml)?;
        self.read_tileset(doc.root_element())
    }

    /// Decode a `.tx` template document.
    pub fn read_template_str(&self, xml: &str) -> Result<Template> {
        let doc = roxmltree::Document::parse(xml)?;
        self.read_template(doc.root_element())
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    fn resolve_tileset(&self, source: &str) -> Result<Tileset> {
        debug!(source, "resolving external tileset");
        (self.tileset_resolver)(source).map_err(|e| Error::unresolved(source, e))
    }

    fn resolve_template(&self, source: &str) -> Result<Template> {
        debug!(source, "resolving object template");
        (self.template_resolver)(source).map_err(|e| Error::unresolved(source, e))
    }

    fn resolve_custom_type(&self, name: &str) -> Option<CustomTypeDefinition> {
        (self.custom_type_resolver)(name)
    }

    /// Member defaults of the custom class named by an element's `class`
    /// (or `type`). None when the name is empty or not a known class.
    fn class_properties(&self, class: &str) -> Option<Properties> {
        if class.is_empty() {
            return None;
        }
        match self.resolve_custom_type(class)? {
            CustomTypeDefinition::Class(def) => Some(def.instantiate()),
            CustomTypeDefinition::Enum(_) => None,
        }
    }
}

/// Require a specific root tag.
fn expect_tag<E: Element>(element: E, tag: &str) -> Result<()> {
    if element.tag() != tag {
        return Err(Error::grammar(format!(
            "expected <{tag}> element, found <{}>",
            element.tag()
        )));
    }
    Ok(())
}
