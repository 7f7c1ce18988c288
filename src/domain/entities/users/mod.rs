//! Users Entity Module

pub mod user;

pub use user::User;
