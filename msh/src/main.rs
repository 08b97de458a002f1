use mini_shell::config::ShellConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = ShellConfig::from_env();
    if let Err(err) = mini_shell::init_tracing(&config) {
        eprintln!("msh: logging disabled: {err:#}");
    }

    mini_shell::setup_panic_handler();
    mini_shell::run_interactive(config)
}
