//! Shareable scenario links: parameter sets encoded as URL query strings.

pub mod codec;
pub mod params;

pub use codec::{DecodedScenario, QueryCodec};
pub use params::{BondScenario, MonetaryScenario, OptionScenario};
