pub mod apis;
pub mod errors;
