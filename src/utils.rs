pub mod paths;

pub use paths::{app_config_dir, default_config_path, is_plain_file_name};
