use std::fmt;

use crate::meta::Meta;

/// metadata type for location data (attached by the generated parser)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct LocationMeta {
    /// 1-based line number in the source file
    pub line: usize,
}

impl From<usize> for LocationMeta {
    fn from(line: usize) -> Self {
        Self { line }
    }
}

impl fmt::Display for LocationMeta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line {}", self.line)
    }
}

pub trait GetLocation {
    fn get_location(&self) -> LocationMeta;

    fn get_line(&self) -> usize {
        self.get_location().line
    }
}

impl<ItemT> GetLocation for Meta<ItemT, LocationMeta> {
    fn get_location(&self) -> LocationMeta {
        *self.get_meta()
    }
}
