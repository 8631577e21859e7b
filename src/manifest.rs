use crate::shaders::{OUTPUT_DIR, OUTPUT_EXTENSION};
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;

///base_pathに書き出すQt resource collectionのファイル名
pub const MANIFEST_FILE_NAME: &str = "vulkan_shaders.qrc";

///コンパイル済みシェーダーを並べたリソース一覧
///名前のエスケープはしない
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub shader_names: Vec<String>,
}

impl Manifest {
    pub fn new(shader_names: Vec<String>) -> Self {
        Self { shader_names }
    }

    ///既存のファイルは上書きする
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write manifest {}", path.display()))
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE RCC>")?;
        writeln!(f, "<RCC version=\"1.0\">")?;
        writeln!(f, "<qresource>")?;
        for name in &self.shader_names {
            writeln!(f, "  <file>{}/{}.{}</file>", OUTPUT_DIR, name, OUTPUT_EXTENSION)?;
        }
        writeln!(f, "</qresource>")?;
        writeln!(f, "</RCC>")
    }
}
