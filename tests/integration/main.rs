#[path = "../common/mod.rs"]
#[macro_use]
pub mod common;

mod admin;
mod health;
mod internal;
mod middleware;
