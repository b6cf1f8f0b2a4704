// Codec module for the BSER binary serialization format

pub mod buffer;
pub mod config;
pub mod decode;
pub mod encode;
pub mod header;
pub mod pdu;
pub mod text;
pub mod types;
pub mod width;
