pub mod listings;
pub mod password;
pub mod permissions;
pub mod token;
