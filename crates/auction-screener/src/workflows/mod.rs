pub mod screening;
pub mod transactions;
