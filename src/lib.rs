// BSER library entry point

pub mod codec;
pub mod internal;

pub use codec::config::CodecConfig;
pub use codec::decode::{loads, loads_bytes, loads_bytes_with_config, loads_with_config};
pub use codec::encode::{dumps, dumps_any, dumps_with_config, Encode, Encoder};
pub use codec::pdu::pdu_len;
pub use codec::types::{Object, Opcode, Value};
pub use internal::error::{Error, Result};
