pub mod comparison;
pub mod products;
pub mod validation;
pub mod wizard;
