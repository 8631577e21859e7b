use crate::locator::ToolLocator;

use log::error;
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod compiler;
mod locator;
mod manifest;
mod pipeline;
mod shaders;

fn main() -> ExitCode {
    //RUST_LOGが指定されていなければinfo
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    //引数がなければカレントディレクトリのシェーダーを対象にする
    let base_path = match env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => match env::current_dir() {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to get current directory. Cause: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let result = pipeline::run(&base_path, &ToolLocator::from_env());
    if let Err(error) = &result {
        pipeline::report_error(error, &mut io::stderr());
    }

    ExitCode::from(pipeline::exit_status(&result))
}
