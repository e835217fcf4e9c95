//! 具体渠道实现

pub mod bark;
pub mod servchan3;

pub use bark::{BarkExtParams, BarkLevel, BarkPayload, BarkProvider};
pub use servchan3::{ServChan3ExtParams, ServChan3Payload, ServChan3Provider};
