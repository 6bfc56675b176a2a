pub mod json;

pub use json::{JsonFormatter, RESULT_FILE_NAME};
