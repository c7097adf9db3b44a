pub mod backend;
pub mod frontend;
pub mod meta;

mod util;
