mod probe;
mod timeline;
pub mod title;

pub use probe::{probe_chapter, ChapterProbe};
pub use timeline::{build_timeline, Chapter};
