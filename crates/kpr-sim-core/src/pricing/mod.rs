pub mod adjustment;
pub mod breakdown;
