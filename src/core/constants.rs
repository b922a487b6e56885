//! Core constants for the tile pyramid and the cover engines.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Reference square tile size in pixels. The world is `TILE_SIZE * 2^zoom` pixels wide.
pub const TILE_SIZE: f64 = 512.0;

/// Web Mercator latitude limit, where the projected world becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Longitude limit of one world copy.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Deepest zoom level a tile id may address.
pub const MAX_ZOOM: u8 = 30;

/// World copies traversed on each side of the primary world by the frustum cover.
pub const WORLD_COPIES: i32 = 3;

/// Default vertical field of view of the reference camera (radians).
pub const DEFAULT_FIELD_OF_VIEW: f64 = 0.643_501_108_793_284_4;

/// Steepest pitch (radians) the reference camera accepts.
pub const MAX_PITCH: f64 = 85.0 * (std::f64::consts::PI / 180.0);

/// Near clipping plane distance of the reference camera, in world pixels.
pub const NEAR_CLIP_DISTANCE: f64 = 1.0;

/// Minimum number of maximum-zoom tiles kept around the view center.
pub const DEFAULT_TILE_LOD_MIN_RADIUS: f64 = 3.0;

/// Multiplier applied to tile distances before comparing against split thresholds.
pub const DEFAULT_TILE_LOD_SCALE: f64 = 1.0;

/// Pitch (radians) above which distant tiles may use coarser zoom levels.
pub const DEFAULT_TILE_LOD_PITCH_THRESHOLD: f64 = 60.0 * (std::f64::consts::PI / 180.0);
