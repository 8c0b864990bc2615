pub mod controller;
pub mod crud;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod schema;
