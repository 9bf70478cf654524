//! Common constants used throughout the Sprout application.

/// Supported blueprint file names, tried in order inside the templates directory
pub const CONFIG_FILES: [&str; 3] = ["sprout.json", "sprout.yml", "sprout.yaml"];

/// The package manifest file created by the package manager's init
pub const MANIFEST_FILE: &str = "package.json";
pub const NPM_LOCK_FILE: &str = "package-lock.json";
pub const YARN_LOCK_FILE: &str = "yarn.lock";

/// Marker entry of a version-controlled directory
pub const GIT_DIR: &str = ".git";

/// Submodule registration file written by `git submodule add`
pub const GITMODULES_FILE: &str = ".gitmodules";

/// Branch used when a submodule declares none, and the default target branch
pub const DEFAULT_BRANCH: &str = "main";

/// Commit message used when the blueprint declares none
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";

/// Package-relative source directory role when the blueprint declares none
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Package-relative build directory role when the blueprint declares none
pub const DEFAULT_BUILD_DIR: &str = "dist";
