//! Tile identifiers for the quadtree pyramid.
//!
//! Three levels of addressing are used:
//! - [`CanonicalTileId`] names a tile inside a single copy of the world.
//! - [`UnwrappedTileId`] adds the world copy (`wrap`) the tile belongs to.
//! - [`OverscaledTileId`] is what gets rendered: it may display data of a
//!   lower canonical zoom at a higher apparent zoom.

use crate::{core::constants::MAX_ZOOM, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tiles along one axis at zoom `z`.
#[inline]
pub fn tiles_per_axis(z: u8) -> u64 {
    1u64 << z
}

/// Represents a tile within one copy of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalTileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl CanonicalTileId {
    /// Creates a tile id, panicking when it is outside the pyramid
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        assert!(z <= MAX_ZOOM, "zoom {} exceeds {}", z, MAX_ZOOM);
        assert!(
            u64::from(x) < tiles_per_axis(z) && u64::from(y) < tiles_per_axis(z),
            "tile {}/{}/{} is outside the pyramid",
            z,
            x,
            y
        );
        Self { z, x, y }
    }

    /// Checked variant of [`CanonicalTileId::new`]
    pub fn try_new(z: u8, x: u32, y: u32) -> Result<Self> {
        if z > MAX_ZOOM || u64::from(x) >= tiles_per_axis(z) || u64::from(y) >= tiles_per_axis(z) {
            return Err(Error::InvalidTile { z, x, y });
        }
        Ok(Self { z, x, y })
    }

    /// Gets the parent tile at a lower zoom level
    pub fn parent(&self) -> Option<CanonicalTileId> {
        if self.z == 0 {
            None
        } else {
            Some(Self {
                z: self.z - 1,
                x: self.x >> 1,
                y: self.y >> 1,
            })
        }
    }

    /// Gets the child tiles at a higher zoom level, in quadrant order
    pub fn children(&self) -> Vec<CanonicalTileId> {
        if self.z >= MAX_ZOOM {
            return Vec::new();
        }
        let (z, x, y) = (self.z + 1, self.x << 1, self.y << 1);
        vec![
            Self { z, x, y },
            Self { z, x: x + 1, y },
            Self { z, x, y: y + 1 },
            Self { z, x: x + 1, y: y + 1 },
        ]
    }

    /// Returns true when `parent` is a strict ancestor of this tile
    pub fn is_child_of(&self, parent: &CanonicalTileId) -> bool {
        if parent.z >= self.z {
            return false;
        }
        let shift = self.z - parent.z;
        (self.x >> shift) == parent.x && (self.y >> shift) == parent.y
    }

    /// Ancestor at `z`, or the top-left descendant when `z` is deeper
    pub fn scaled_to(&self, z: u8) -> CanonicalTileId {
        if z <= self.z {
            let shift = self.z - z;
            Self {
                z,
                x: self.x >> shift,
                y: self.y >> shift,
            }
        } else {
            let shift = z - self.z;
            Self {
                z,
                x: self.x << shift,
                y: self.y << shift,
            }
        }
    }
}

impl fmt::Display for CanonicalTileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A tile including the world copy it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnwrappedTileId {
    pub wrap: i32,
    pub canonical: CanonicalTileId,
}

impl UnwrappedTileId {
    /// Creates an id from an unwrapped column.
    ///
    /// `x` may lie in any world copy and is split into `wrap` and a canonical
    /// column; `y` is clamped into the pyramid, and `wrap` into `i32`.
    pub fn new(z: u8, x: i64, y: i64) -> Self {
        let dim = tiles_per_axis(z) as i64;
        let wrap = x
            .div_euclid(dim)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        Self {
            wrap: wrap as i32,
            canonical: CanonicalTileId::new(
                z,
                x.rem_euclid(dim) as u32,
                y.clamp(0, dim - 1) as u32,
            ),
        }
    }

    pub fn from_canonical(wrap: i32, canonical: CanonicalTileId) -> Self {
        Self { wrap, canonical }
    }

    /// Column counted from the left edge of world copy 0
    pub fn unwrapped_x(&self) -> i64 {
        i64::from(self.wrap) * tiles_per_axis(self.canonical.z) as i64 + i64::from(self.canonical.x)
    }

    /// Same canonical tile in another world copy
    pub fn unwrap_to(&self, wrap: i32) -> UnwrappedTileId {
        Self {
            wrap,
            canonical: self.canonical,
        }
    }

    pub fn is_child_of(&self, parent: &UnwrappedTileId) -> bool {
        self.wrap == parent.wrap && self.canonical.is_child_of(&parent.canonical)
    }

    /// Renders this tile at a deeper (or equal) zoom
    pub fn overscale_to(&self, overscaled_z: u8) -> OverscaledTileId {
        OverscaledTileId::from_canonical(overscaled_z, self.wrap, self.canonical)
    }
}

impl fmt::Display for UnwrappedTileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wrap == 0 {
            write!(f, "{}", self.canonical)
        } else {
            write!(f, "{}@{}", self.canonical, self.wrap)
        }
    }
}

/// The tile actually rendered, possibly showing data from a lower canonical zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverscaledTileId {
    pub overscaled_z: u8,
    pub wrap: i32,
    pub canonical: CanonicalTileId,
}

impl OverscaledTileId {
    pub fn new(overscaled_z: u8, wrap: i32, z: u8, x: u32, y: u32) -> Self {
        Self::from_canonical(overscaled_z, wrap, CanonicalTileId::new(z, x, y))
    }

    pub fn from_canonical(overscaled_z: u8, wrap: i32, canonical: CanonicalTileId) -> Self {
        assert!(
            overscaled_z >= canonical.z,
            "overscaled zoom {} is below canonical zoom {}",
            overscaled_z,
            canonical.z
        );
        Self {
            overscaled_z,
            wrap,
            canonical,
        }
    }

    /// How many times the canonical tile is magnified
    pub fn overscale_factor(&self) -> u32 {
        1u32 << (self.overscaled_z - self.canonical.z)
    }

    /// Same rendered area addressed at another overscaled zoom
    pub fn scaled_to(&self, z: u8) -> OverscaledTileId {
        let canonical = if z >= self.canonical.z {
            self.canonical
        } else {
            self.canonical.scaled_to(z)
        };
        Self {
            overscaled_z: z,
            wrap: self.wrap,
            canonical,
        }
    }

    pub fn to_unwrapped(&self) -> UnwrappedTileId {
        UnwrappedTileId::from_canonical(self.wrap, self.canonical)
    }

    pub fn is_child_of(&self, parent: &OverscaledTileId) -> bool {
        self.wrap == parent.wrap
            && self.overscaled_z > parent.overscaled_z
            && (self.canonical == parent.canonical || self.canonical.is_child_of(&parent.canonical))
    }
}

impl fmt::Display for OverscaledTileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=>{}", self.to_unwrapped(), self.overscaled_z)
    }
}
