pub mod chunk_buffer;
pub mod codec;
