//! # walkways-types
//!
//! Value types shared by the walkways proximity engine and its CLI.
//!
//! - **Point types**: `IndexedPoint<T>`, a planar coordinate carrying an opaque payload
//! - **Region types**: `Region` (axis-aligned rectangle) and `Circle`
//! - **Edge types**: `Edge<K>`, a resolved walking connection between two stops
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use walkways_types::point::IndexedPoint;
//! use walkways_types::region::Region;
//!
//! let stop = IndexedPoint::new(13.4050, 52.5200, "berlin-hbf");
//! let area = Region::new(13.0, 52.0, 14.0, 53.0);
//! assert!(area.contains(&stop));
//! ```

pub mod edge;
pub mod point;
pub mod region;
