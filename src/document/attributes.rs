//! Typed attribute extraction.
//!
//! All parsing is locale-invariant: numbers use `.` as the decimal point and
//! booleans accept exactly `true`, `false`, `1` and `0`.

use super::Element;
use crate::util::{Color, Error, Result};

/// A scalar type that can be decoded from a single attribute value.
pub trait FromAttribute: Sized {
    /// Type name reported in errors.
    const EXPECTED: &'static str;

    /// Parse the raw attribute text. Returns None when malformed.
    fn from_attribute(value: &str) -> Option<Self>;
}

impl FromAttribute for String {
    const EXPECTED: &'static str = "string";

    fn from_attribute(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FromAttribute for bool {
    const EXPECTED: &'static str = "bool";

    fn from_attribute(value: &str) -> Option<Self> {
        match value.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

macro_rules! impl_from_attribute_num {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromAttribute for $ty {
                const EXPECTED: &'static str = $name;

                fn from_attribute(value: &str) -> Option<Self> {
                    value.trim().parse().ok()
                }
            }
        )*
    };
}

impl_from_attribute_num! {
    u8 => "byte",
    i32 => "int",
    u32 => "unsigned int",
    f32 => "float",
}

impl FromAttribute for Color {
    const EXPECTED: &'static str = "color";

    fn from_attribute(value: &str) -> Option<Self> {
        Color::parse(value)
    }
}

/// Look up a token in a caller-supplied token table.
pub fn lookup_token<T: Copy>(tokens: &[(&str, T)], token: &str) -> Option<T> {
    tokens
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, value)| *value)
}

/// Attribute accessors available on every [`Element`].
pub trait Attributes: Element {
    /// Decode a required attribute.
    fn required<T: FromAttribute>(&self, name: &str) -> Result<T> {
        let raw = self.attr(name).ok_or_else(|| Error::MissingAttribute {
            name: name.to_string(),
            expected: T::EXPECTED,
        })?;
        T::from_attribute(raw).ok_or_else(|| Error::malformed(name, raw, T::EXPECTED))
    }

    /// Decode an optional attribute. Absence is `Ok(None)`, a present but
    /// malformed value is an error.
    fn optional<T: FromAttribute>(&self, name: &str) -> Result<Option<T>> {
        self.attr(name)
            .map(|raw| T::from_attribute(raw).ok_or_else(|| Error::malformed(name, raw, T::EXPECTED)))
            .transpose()
    }

    /// Decode an optional attribute, substituting `default` when absent.
    fn optional_or<T: FromAttribute>(&self, name: &str, default: T) -> Result<T> {
        Ok(self.optional(name)?.unwrap_or(default))
    }

    /// Decode a required attribute with a custom parser.
    fn required_with<T>(
        &self,
        name: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let raw = self.attr(name).ok_or_else(|| Error::MissingAttribute {
            name: name.to_string(),
            expected,
        })?;
        parse(raw).ok_or_else(|| Error::malformed(name, raw, expected))
    }

    /// Decode a required attribute through an explicit token table.
    fn required_enum<T: Copy>(&self, name: &str, tokens: &[(&str, T)]) -> Result<T> {
        let raw = self.attr(name).ok_or_else(|| Error::MissingAttribute {
            name: name.to_string(),
            expected: "enum token",
        })?;
        lookup_token(tokens, raw).ok_or_else(|| Error::UnknownEnumToken {
            name: name.to_string(),
            value: raw.to_string(),
        })
    }

    /// Decode an optional attribute through an explicit token table.
    fn optional_enum<T: Copy>(&self, name: &str, tokens: &[(&str, T)]) -> Result<Option<T>> {
        match self.attr(name) {
            None => Ok(None),
            Some(raw) => lookup_token(tokens, raw)
                .map(Some)
                .ok_or_else(|| Error::UnknownEnumToken {
                    name: name.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Decode an optional token attribute, substituting `default` when absent.
    fn optional_enum_or<T: Copy>(&self, name: &str, tokens: &[(&str, T)], default: T) -> Result<T> {
        Ok(self.optional_enum(name, tokens)?.unwrap_or(default))
    }
}

impl<E: Element> Attributes for E {}
