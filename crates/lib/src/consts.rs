//! Fixed names shared across the crate.

/// Project file looked up at the project root.
pub const PROJECT_FILE: &str = "lathe.toml";

/// Profiling statistics written next to a bundle when `--profile` is set.
pub const STATS_FILE: &str = "stats.json";

/// Suffix that marks a type-declaration file.
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Root declaration entry handed to the compiler for library builds.
pub const DECLARATION_ENTRY: &str = "main.d.ts";

pub const DEFAULT_DECLARATIONS_DIR: &str = "typings";
pub const DEFAULT_SRC_DIR: &str = "src";
pub const DEFAULT_TEST_DIR: &str = "test";
pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_LIB_DIR: &str = "lib";
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Source extension compiled by the library builds and checked by `lint:ts`.
pub const SOURCE_EXTENSION: &str = "ts";

/// Script extension checked by `lint:es`.
pub const SCRIPT_EXTENSION: &str = "js";
