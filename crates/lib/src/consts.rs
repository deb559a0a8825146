/// Application name used for default directories and environment variables.
pub const APP_NAME: &str = "assetpipe";

/// Default name of the storage folder created under the uploads directory.
pub const DEFAULT_STORAGE_FOLDER_NAME: &str = "compiled-scss-and-js";

/// Default public URL of the uploads directory.
pub const DEFAULT_UPLOADS_URL: &str = "/uploads";

/// Dependency scripts get when the caller does not name any.
pub const DEFAULT_SCRIPT_DEPENDENCY: &str = "jquery";

/// Extension of style sources that get the variables preamble.
pub const SCSS_EXTENSION: &str = "scss";

/// Prefix of remote mirror files inside the storage folder.
pub const MIRROR_PREFIX: &str = "cached-";

/// Suffix of the localized-variables object handed to the host for scripts.
pub const LOCALIZED_VARS_SUFFIX: &str = "_vars";

pub const ENV_UPLOADS_DIR: &str = "ASSETPIPE_UPLOADS_DIR";
pub const ENV_UPLOADS_URL: &str = "ASSETPIPE_UPLOADS_URL";
pub const ENV_DEBUG: &str = "ASSETPIPE_DEBUG";
