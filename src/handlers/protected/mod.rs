// Everything here runs behind the authorization gate; the route table in
// `app.rs` declares which permission, if any, each handler requires.
pub mod auth;
pub mod faqs;
pub mod feedback;
pub mod objects;
pub mod permissions;
pub mod reservations;
pub mod roles;
pub mod tags;
pub mod users;
