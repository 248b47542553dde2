pub mod amm;
pub mod emission;
