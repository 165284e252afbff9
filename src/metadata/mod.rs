mod compose;
mod fields;
mod reader;

pub use compose::{compose, SeedTemplate};
pub use fields::OutputTags;
pub use reader::read_output_tags;
