pub mod errors;
pub mod rest;
