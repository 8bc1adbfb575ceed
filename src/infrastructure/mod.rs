pub mod cleanup;
pub mod db;
pub mod jwt;
pub mod password;
pub mod repositories;
pub mod state;
