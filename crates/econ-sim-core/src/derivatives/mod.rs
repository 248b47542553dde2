pub mod forwards;
pub mod options;
