use anyhow::{bail, Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

///ソースファイルを1つ受け取りSPIR-Vを出力するもの
///テストでは外部プロセスの代わりに偽物を差し込む
pub trait ShaderCompiler {
    fn compile(&self, source: &Path, destination: &Path) -> Result<()>;
}

pub struct GlslangValidator {
    executable: PathBuf,
}

impl GlslangValidator {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    fn command(&self, source: &Path, destination: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        //-VでSPIR-Vを生成する
        command.arg("-V").arg(source).arg("-o").arg(destination);
        command
    }
}

impl ShaderCompiler for GlslangValidator {
    fn compile(&self, source: &Path, destination: &Path) -> Result<()> {
        let mut command = self.command(source, destination);
        debug!("Running {:?}", command);

        //標準出力とエラー出力は継承するのでglslangValidatorの診断はそのまま表示される
        let status = command
            .status()
            .with_context(|| format!("Failed to run {}", self.executable.display()))?;

        if !status.success() {
            bail!("{} exited with {} for {}", self.executable.display(), status, source.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs;

    #[test]
    fn test_command_arguments() {
        let compiler = GlslangValidator::new(PathBuf::from("/opt/glslang/bin/glslangValidator"));
        let command = compiler.command(Path::new("shaders/a.glsl"), Path::new("shaders/spv/a.spv"));

        assert_eq!(command.get_program(), OsStr::new("/opt/glslang/bin/glslangValidator"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            vec![
                OsStr::new("-V"),
                OsStr::new("shaders/a.glsl"),
                OsStr::new("-o"),
                OsStr::new("shaders/spv/a.spv"),
            ]
        );
    }

    #[test]
    fn test_missing_executable_is_an_error() {
        let missing = std::env::temp_dir().join("spv_qrc_no_such_compiler").join("glslangValidator");
        let compiler = GlslangValidator::new(missing);

        let result = compiler.compile(Path::new("a.glsl"), Path::new("a.spv"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join(name);
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_checked() {
        let dir = std::env::temp_dir().join(format!("spv_qrc_compiler_status_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let ok = GlslangValidator::new(install_script(&dir, "ok", "exit 0"));
        let failing = GlslangValidator::new(install_script(&dir, "failing", "exit 1"));

        assert!(ok.compile(Path::new("a.glsl"), Path::new("a.spv")).is_ok());
        let error = failing.compile(Path::new("a.glsl"), Path::new("a.spv")).unwrap_err();
        assert!(error.to_string().contains("a.glsl"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_arguments_reach_the_process() {
        let dir = std::env::temp_dir().join(format!("spv_qrc_compiler_args_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        //引数をそのまま出力先に書き出すだけのスクリプト
        let echo = install_script(&dir, "echo_args", "printf '%s ' \"$@\" > \"$4\"");
        let destination = dir.join("a.spv");
        GlslangValidator::new(echo)
            .compile(Path::new("a.glsl"), &destination)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            format!("-V a.glsl -o {} ", destination.display())
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
