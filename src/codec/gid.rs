//! Global tile id (GID) bit layout.
//!
//! ```text
//!  31  30  29  28 ................................ 0
//! +---+---+---+-----------------------------------+
//! | H | V | D |            raw tile id            |
//! +---+---+---+-----------------------------------+
//! ```
//!
//! The three flip bits are independent. Clearing them yields the id used for
//! tileset lookup.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit 31: horizontal flip.
pub const FLIPPED_HORIZONTALLY_FLAG: u32 = 0x8000_0000;

/// Bit 30: vertical flip.
pub const FLIPPED_VERTICALLY_FLAG: u32 = 0x4000_0000;

/// Bit 29: diagonal flip (anti-diagonal transpose).
pub const FLIPPED_DIAGONALLY_FLAG: u32 = 0x2000_0000;

/// Mask of all flip bits.
pub const FLIP_FLAGS_MASK: u32 =
    FLIPPED_HORIZONTALLY_FLAG | FLIPPED_VERTICALLY_FLAG | FLIPPED_DIAGONALLY_FLAG;

/// Mask of the raw tile id.
pub const TILE_ID_MASK: u32 = !FLIP_FLAGS_MASK;

/// Set of orientation flags carried by a tile reference.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlipFlags(u32);

impl FlipFlags {
    pub const NONE: Self = Self(0);
    pub const HORIZONTAL: Self = Self(FLIPPED_HORIZONTALLY_FLAG);
    pub const VERTICAL: Self = Self(FLIPPED_VERTICALLY_FLAG);
    pub const DIAGONAL: Self = Self(FLIPPED_DIAGONALLY_FLAG);

    /// Extract the flags from a raw 32-bit reference.
    #[inline]
    pub const fn from_gid(raw: u32) -> Self {
        Self(raw & FLIP_FLAGS_MASK)
    }

    /// The flags in their on-disk bit positions.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn horizontal(self) -> bool {
        self.contains(Self::HORIZONTAL)
    }

    #[inline]
    pub const fn vertical(self) -> bool {
        self.contains(Self::VERTICAL)
    }

    #[inline]
    pub const fn diagonal(self) -> bool {
        self.contains(Self::DIAGONAL)
    }
}

impl BitOr for FlipFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FlipFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FlipFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("FlipFlags(NONE)");
        }
        let names: Vec<&str> = [
            (Self::HORIZONTAL, "HORIZONTAL"),
            (Self::VERTICAL, "VERTICAL"),
            (Self::DIAGONAL, "DIAGONAL"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        write!(f, "FlipFlags({})", names.join(" | "))
    }
}

/// Split a raw reference into its tile id and flip flags.
#[inline]
pub const fn split_gid(raw: u32) -> (u32, FlipFlags) {
    (raw & TILE_ID_MASK, FlipFlags::from_gid(raw))
}

/// Inverse of [`split_gid`].
#[inline]
pub const fn combine_gid(id: u32, flags: FlipFlags) -> u32 {
    (id & TILE_ID_MASK) | flags.bits()
}

/// One decoded cell of tile data: the tile id with its flip flags cleared,
/// and the flags themselves. An id of 0 means "no tile".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileRef {
    pub gid: u32,
    pub flip: FlipFlags,
}

impl TileRef {
    /// Empty cell.
    pub const EMPTY: Self = Self { gid: 0, flip: FlipFlags::NONE };

    /// Decode a raw 32-bit reference.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        let (gid, flip) = split_gid(raw);
        Self { gid, flip }
    }

    /// Re-encode to the raw 32-bit reference.
    #[inline]
    pub const fn to_raw(self) -> u32 {
        combine_gid(self.gid, self.flip)
    }

    /// Whether this cell holds no tile.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.gid == 0
    }
}
