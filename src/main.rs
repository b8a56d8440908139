use std::path::Path;
use std::process::ExitCode;

use tinsel::{SceneConfig, SceneError, TreeScene};

fn run() -> Result<(), SceneError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(Path::new(&path))?,
        None => SceneConfig::default(),
    };
    TreeScene::new().with_config(config).run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
