use crate::compiler::{GlslangValidator, ShaderCompiler};
use crate::locator::{ToolLocator, OVERRIDE_VAR, SDK_ROOT_VAR, TOOL_NAME};
use crate::manifest::{Manifest, MANIFEST_FILE_NAME};
use crate::shaders;
use log::{error, info, log_enabled, Level};
use std::error::Error;
use std::fmt;
use std::io::Write;
use std::path::Path;

#[derive(Debug)]
pub enum PipelineError {
    ToolNotFound,
    CompilationFailed { failed: Vec<String> },
    Other(anyhow::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ToolNotFound => write!(
                f,
                "Unable to find {}. Make sure it's either in PATH, that {} is defined and points to the right directory, or that {} names the executable.",
                TOOL_NAME, SDK_ROOT_VAR, OVERRIDE_VAR
            ),
            PipelineError::CompilationFailed { failed } => {
                write!(f, "{} shader(s) failed to compile: {}", failed.len(), failed.join(", "))
            }
            PipelineError::Other(e) => write!(f, "{:#}", e),
        }
    }
}

impl Error for PipelineError {}

impl From<anyhow::Error> for PipelineError {
    fn from(e: anyhow::Error) -> Self {
        PipelineError::Other(e)
    }
}

///コンパイラを探してからbase_pathのシェーダーをコンパイルする
///見つからなければファイルシステムには何も書かない
pub fn run(base_path: &Path, locator: &ToolLocator) -> Result<(), PipelineError> {
    let executable = locator.locate().ok_or(PipelineError::ToolNotFound)?;
    info!("Using GLSL compiler: {}", executable.display());

    run_with(base_path, &GlslangValidator::new(executable))
}

///コンパイル → マニフェスト出力
///失敗したシェーダーはマニフェストに載せず、マニフェストを書いた後でエラーを返す
pub fn run_with(base_path: &Path, compiler: &dyn ShaderCompiler) -> Result<(), PipelineError> {
    let report = shaders::compile_all(base_path, compiler)?;

    let manifest_path = base_path.join(MANIFEST_FILE_NAME);
    let compiled_count = report.compiled.len();
    let success = report.is_success();
    Manifest::new(report.compiled).write(&manifest_path)?;
    info!("Wrote {} with {} shader(s)", manifest_path.display(), compiled_count);

    if !success {
        return Err(PipelineError::CompilationFailed {
            failed: report.failed.into_iter().map(|(name, _)| name).collect(),
        });
    }

    Ok(())
}

///プロセスの終了コード、成功以外はすべて1
pub fn exit_status(result: &Result<(), PipelineError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

///RUST_LOG=offなどでerrorが出力されない場合でもstderrには必ず書く
pub fn report_error<W: Write>(error: &PipelineError, stderr: &mut W) {
    if log_enabled!(Level::Error) {
        error!("Error: {}", error);
    } else {
        let _ = writeln!(stderr, "Error: {}", error);
    }
}
