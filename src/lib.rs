pub mod errors;
pub mod name;
pub mod processing;
pub mod resolver;
pub mod whitelist;
