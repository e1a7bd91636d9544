pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

#[cfg(test)]
mod tests;
