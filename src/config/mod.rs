mod resolver;

pub use resolver::{
    glob_match, Config, ConfigError, DEFAULT_EXCLUDE_DIRS, DEFAULT_IGNORED_DECORATORS,
    DEFAULT_IGNORED_NAMES,
};
