// handlers/public/auth/mod.rs - account handlers
//
// Sign-up and login establish a session cookie and redirect to the pending
// list; every failure re-renders the same form with the error and the
// submitted username. Logout only acts on POST.

pub mod login;
pub mod logout;
pub mod signup;

pub use login::{get as login_get, post as login_post};
pub use logout::post as logout_post;
pub use signup::{get as signup_get, post as signup_post};

/// Where a fresh session lands
pub const AFTER_LOGIN: &str = "/todos";
