use std::sync::Arc;

use codemap::{CodeMap, File};

use crate::meta::{LocationMeta, MetaMapper};

/// source file registered in a codemap, maps byte offsets reported by the parser to lines
#[derive(Clone)]
pub struct SourceMap {
    file: Arc<File>,
}

impl SourceMap {
    pub fn new(file_name: String, source_code: String) -> Self {
        let file = CodeMap::new().add_file(file_name, source_code);
        Self { file }
    }

    pub fn file_name(&self) -> &str {
        self.file.name()
    }

    pub fn source_code(&self) -> &str {
        self.file.source()
    }

    /// 1-based line of the byte offset, offsets past the end map to the last line
    pub fn locate(&self, offset: usize) -> LocationMeta {
        let offset = offset.min(self.file.source().len());
        let pos = self.file.span.low() + offset as u64;
        LocationMeta::from(self.file.find_line(pos) + 1)
    }
}

/// necessary for reporting errors with the name of the file they come from
impl MetaMapper<LocationMeta, String> for SourceMap {
    fn map_meta(&self, from: &LocationMeta) -> String {
        format!("{}:{}", self.file.name(), from.line)
    }
}
