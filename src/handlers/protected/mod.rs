// handlers/protected/mod.rs - handlers that require a session
//
// Every operation here takes the caller's identity explicitly and fails with
// `Unauthorized` (redirect to /login) when there is none. Todo lookups always
// go through the owner-scoped store methods.

pub mod todos;
