pub mod args;
pub mod op;
pub mod ops;

pub use ops::{HashOwner, Init, Serve, Version};
