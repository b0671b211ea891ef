// handlers/public/mod.rs - handlers reachable without a session
//
// Home page and the account flows (login, sign-up, logout). These never read
// the todo store.

pub mod auth;
pub mod home;
