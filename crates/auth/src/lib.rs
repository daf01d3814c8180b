//! `affilia-auth` — roles and user records.
//!
//! The role enum is the single dispatch point for every role-gated rule in
//! the workspace (status transitions, balance semantics, sale visibility,
//! ticket handling).

pub mod role;
pub mod user;

pub use role::Role;
pub use user::User;
