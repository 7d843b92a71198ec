pub mod calculator_state;
pub mod saved;
