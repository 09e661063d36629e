pub mod generator;

pub use generator::{generate, leading_size, sized_buffer, BufferGenerator};
