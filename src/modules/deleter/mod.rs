pub mod controller;
pub mod crud;
pub mod error;
pub mod model;
pub mod schema;
pub mod session;

#[cfg(test)]
mod testing;
