mod intake;
mod routes;

pub use routes::{router, WebState};
