mod cursor;
mod goto;
mod mutation;
mod path_frame;
mod traversal;

pub use cursor::{CursorInfo, ExtentCursor, ExtentFlags, ObservedExtent};
pub use mutation::{DeleteFlags, InsertFlags};
pub use traversal::Verb;
