//! Secret masking for printed configuration

pub mod mask;

pub use mask::mask_secret;
