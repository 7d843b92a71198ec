pub mod installment_grid;
