//! Text-side extraction stages, leaf first: normalize, locate the section,
//! segment it per generator, then pull amounts out of each block.

pub mod fields;
pub mod normalize;
pub mod section;
pub mod segment;
pub mod values;
