pub mod env;
pub mod visitor;
