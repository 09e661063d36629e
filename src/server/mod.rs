pub mod acceptor;
pub mod handler;

pub use acceptor::{bind, Acceptor};
pub use handler::handle_connection;
