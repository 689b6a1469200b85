mod json;

pub use json::{load_result_file, save_result_file};
