pub mod hash_owner;
pub mod init;
pub mod serve;
pub mod version;

pub use hash_owner::HashOwner;
pub use init::Init;
pub use serve::Serve;
pub use version::Version;
