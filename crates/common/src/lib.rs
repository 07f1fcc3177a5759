/**
 * Media type helpers.
 *  - Parsing a `Content-Type` down to its essence
 *  - The set of types a fragment may carry
 */
pub mod media;
/**
 * Owner identity.
 * Turns an authenticated user name into the
 *  opaque id fragments are partitioned by.
 */
pub mod owner;
/**
 * The fragment domain model.
 * Validates inputs and drives the storage
 *  facade through a fragment's lifecycle.
 */
pub mod fragment;
/**
 * Format conversion.
 * Maps a fragment's media type and a requested
 *  extension to converted bytes, guarded by a
 *  static compatibility table.
 */
pub mod convert;
/**
 * Build version information.
 */
pub mod version;

pub mod prelude {
    pub use crate::convert::{convert, ConvertError, Converted, Extension};
    pub use crate::fragment::{Fragment, FragmentError, NewFragment, UserFragments, ValidationError};
    pub use crate::media::is_supported_type;
    pub use crate::owner::OwnerId;
    pub use crate::version::build_info;
}
