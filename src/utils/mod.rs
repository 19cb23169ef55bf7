pub mod environment;
pub mod paths;

pub use environment::default_db_path;
pub use paths::{format_path_with_tilde, read_transcript_text, validate_file_size};
