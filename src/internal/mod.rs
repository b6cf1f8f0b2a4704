// Internal utilities shared by the codec

pub mod error;
