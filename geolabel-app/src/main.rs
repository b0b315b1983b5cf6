mod app;
mod app_dir;
mod app_state;
mod cli;
mod config;
mod fetch;
mod fetch_worker;
mod input;
mod records;
mod session;
mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::run()
}
