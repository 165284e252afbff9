mod info;

pub use info::{display_name, BookInfo};
