//! Domain models for the HBnB console.
//!
//! # Core Concepts
//!
//! - [`ClassName`]: the closed set of record kinds (BaseModel, User, State,
//!   City, Amenity, Place, Review) and their default attribute schemas.
//! - [`Record`]: one managed object, identified by a UUID and carrying an open
//!   bag of named [`AttrValue`]s.
//! - [`AttrValue`]: a typed attribute value, with [`AttrValue::coerce`] turning
//!   raw command tokens into integers, floats or strings.

mod class;
mod record;
mod value;

pub use class::*;
pub use record::*;
pub use value::AttrValue;
