//! Integration tests
//!
//! `routes` drives the router without a database. `persistence` needs a
//! PostgreSQL server at `DATABASE_URL`: cargo test -- --ignored

mod persistence;
mod routes;
mod support;
