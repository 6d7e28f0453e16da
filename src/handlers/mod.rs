// Public handlers need no credential; protected handlers sit behind the
// authorization gate, which runs once per request before the handler.
pub mod list;
pub mod protected;
pub mod public;
