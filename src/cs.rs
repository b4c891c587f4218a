pub mod bits;
pub mod channel;
pub mod ecc;

// Re-export the types every pipeline touches
pub use bits::{count_differences, BitVector};
pub use channel::{Channel, ChannelModel, Transmission};
pub use ecc::{DecodeResult, ErrorCorrection, HammingCode};
