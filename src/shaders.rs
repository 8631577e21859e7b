use crate::compiler::ShaderCompiler;
use anyhow::{Context, Result};
use glob::Pattern;
use log::{debug, error, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "glsl";
pub const OUTPUT_DIR: &str = "spv";
pub const OUTPUT_EXTENSION: &str = "spv";

///1つのGLSLファイルとその出力先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderUnit {
    pub name: String,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl ShaderUnit {
    fn new(base_path: &Path, source: PathBuf) -> Option<Self> {
        let name = source.file_stem()?.to_str()?.to_owned();
        let output = base_path
            .join(OUTPUT_DIR)
            .join(format!("{}.{}", name, OUTPUT_EXTENSION));

        Some(Self {
            name,
            source,
            output,
        })
    }
}

#[derive(Debug, Default)]
pub struct CompileReport {
    pub compiled: Vec<String>,
    pub failed: Vec<(String, anyhow::Error)>,
}

impl CompileReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

///base_path直下の*.glslを列挙する(サブディレクトリは見ない)
///`.`で始まる隠しファイルは対象外
pub fn discover(base_path: &Path) -> Result<Vec<ShaderUnit>> {
    let pattern = Pattern::new(&format!("*.{}", SOURCE_EXTENSION))?;

    let entries = fs::read_dir(base_path)
        .with_context(|| format!("Failed to read {}", base_path.display()))?;

    let mut units = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read {}", base_path.display()))?
            .path();

        //UTF-8でない名前はパターンに掛けられないので拡張子だけで判断する
        let file_name = match path.file_name().and_then(OsStr::to_str) {
            Some(file_name) => file_name,
            None => {
                if path.extension() == Some(OsStr::new(SOURCE_EXTENSION)) {
                    warn!("Skipping shader with non UTF-8 name: {}", path.display());
                }
                continue;
            }
        };

        if file_name.starts_with('.') || !pattern.matches(file_name) || !path.is_file() {
            continue;
        }

        if let Some(unit) = ShaderUnit::new(base_path, path) {
            units.push(unit);
        }
    }

    //列挙順はファイルシステム依存なので名前順に固定する
    units.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(units)
}

///出力ディレクトリを作る、既に存在する場合はエラーにしない
pub fn ensure_output_dir(base_path: &Path) -> Result<PathBuf> {
    let output_path = base_path.join(OUTPUT_DIR);

    match fs::create_dir(&output_path) {
        Ok(()) => debug!("Created {}", output_path.display()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create {}", output_path.display()))
        }
    }

    Ok(output_path)
}

///1ファイルずつ順番にコンパイルする
///失敗したものはreportのfailedに入れ、残りのファイルは続けてコンパイルする
pub fn compile_all(base_path: &Path, compiler: &dyn ShaderCompiler) -> Result<CompileReport> {
    ensure_output_dir(base_path)?;

    let mut report = CompileReport::default();
    for unit in discover(base_path)? {
        info!("Compiling {}", unit.name);

        match compiler.compile(&unit.source, &unit.output) {
            Ok(()) => report.compiled.push(unit.name),
            Err(e) => {
                error!("Failed to compile {}: {:#}", unit.source.display(), e);
                report.failed.push((unit.name, e));
            }
        }
    }

    Ok(report)
}
