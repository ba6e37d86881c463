// cli/constants.rs — program identity and stream markers for the lz4chain binary.

pub const COMPRESSOR_NAME: &str = "lz4chain";
pub const LZ4_EXTENSION: &str = ".lz4";

/// Extension used by `block` output when no name is given.
pub const BLOCK_EXTENSION: &str = ".lz4b";

/// Path that selects stdin / stdout.
pub const STDIN_MARK: &str = "-";
pub const STDOUT_MARK: &str = "-";

/// Environment variables read by the CLI only.
pub const ENV_CLEVEL: &str = "LZ4_CLEVEL";
pub const ENV_NBWORKERS: &str = "LZ4_NBWORKERS";

/// Default notification level (errors and warnings).
pub const DISPLAY_LEVEL_DEFAULT: i32 = 2;
pub const DISPLAY_LEVEL_MAX: i32 = 5;
