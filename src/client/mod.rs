pub mod pool;
pub mod worker;

pub use pool::ClientPool;
pub use worker::ClientWorker;
