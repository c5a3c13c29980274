pub mod predict;
pub mod rank;
pub mod validate;
