//! HTTP surface of the environment reporter.
//!
//! Every path is treated as an application name; see [`routes::report`].

mod routes;
mod server;
mod state;

#[cfg(test)]
mod tests;

pub use server::create_router;
pub use state::AppState;
