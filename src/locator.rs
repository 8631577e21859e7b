use log::debug;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const TOOL_NAME: &str = "glslangValidator";

///Vulkan SDKのインストール先を指す環境変数
pub const SDK_ROOT_VAR: &str = "VULKAN_SDK";

///コンパイラの実行ファイルを直接指定するための環境変数
pub const OVERRIDE_VAR: &str = "GLSLANG_VALIDATOR";

#[cfg(unix)]
const FALLBACK_DIR: Option<&str> = Some("/opt/glslang/bin");

#[cfg(not(unix))]
const FALLBACK_DIR: Option<&str> = None;

///コンパイラを探す場所
///優先順位は override > PATH > `<sdk_root>/bin` > fallback_dir
#[derive(Debug, Clone, Default)]
pub struct ToolLocator {
    pub override_path: Option<PathBuf>,
    pub search_path: Option<OsString>,
    pub sdk_root: Option<PathBuf>,
    pub fallback_dir: Option<PathBuf>,
}

impl ToolLocator {
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var_os(name))
    }

    ///環境変数の読み出し方を外から渡す
    pub fn from_vars<F: Fn(&str) -> Option<OsString>>(get: F) -> Self {
        Self {
            //空文字列は未設定と同じ扱い
            override_path: get(OVERRIDE_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            search_path: get("PATH"),
            sdk_root: get(SDK_ROOT_VAR).map(PathBuf::from),
            //fallbackはPOSIX系のみ
            fallback_dir: FALLBACK_DIR.map(PathBuf::from),
        }
    }

    pub fn locate(&self) -> Option<PathBuf> {
        //明示的に指定された場合は他の場所を探さない
        if let Some(path) = &self.override_path {
            debug!("Checking {} override: {}", OVERRIDE_VAR, path.display());
            return is_executable(path).then(|| path.clone());
        }

        if let Some(search_path) = &self.search_path {
            debug!("Checking search path");
            if let Some(found) = find_in_dirs(env::split_paths(search_path)) {
                return Some(found);
            }
        }

        if let Some(sdk_root) = &self.sdk_root {
            let bin = sdk_root.join("bin");
            debug!("Checking {}: {}", SDK_ROOT_VAR, bin.display());
            if let Some(found) = find_in_dirs(std::iter::once(bin)) {
                return Some(found);
            }
        }

        if let Some(fallback) = &self.fallback_dir {
            debug!("Checking fallback directory: {}", fallback.display());
            if let Some(found) = find_in_dirs(std::iter::once(fallback.clone())) {
                return Some(found);
            }
        }

        None
    }
}

fn executable_name() -> String {
    format!("{}{}", TOOL_NAME, env::consts::EXE_SUFFIX)
}

fn find_in_dirs<I: IntoIterator<Item = PathBuf>>(dirs: I) -> Option<PathBuf> {
    let name = executable_name();
    dirs.into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(&name))
        .find(|candidate| is_executable(candidate))
}

//通常ファイルで実行権限のビットがどれか立っていれば実行可能とみなす
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
