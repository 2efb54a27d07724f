//! Well-known names and limits shared across the crate.

/// Default file name of the root composite descriptor.
pub const ROOT_DESCRIPTOR_NAME: &str = "build.lua";

/// Default file name of the local override descriptor, looked up in the run directory.
pub const OVERRIDE_FILE_NAME: &str = "local-build.lua";

/// Maximum nesting of `prj.required` chains before traversal gives up.
pub const MAX_REQUIRE_DEPTH: usize = 64;

/// Length of the truncated plan fingerprint.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;
