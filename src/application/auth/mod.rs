pub mod login;
pub mod logout;
pub mod refresh;
pub mod session;
pub mod validate;
