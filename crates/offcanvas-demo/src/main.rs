mod app;
mod cli;

use anyhow::Result;
use clap::Parser;

use offcanvas_engine::logging::init_logging;
use offcanvas_engine::window::Runtime;

use crate::app::DemoApp;
use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.logging());

    log::info!("starting offcanvas demo; press B to block the main thread, Escape to quit");

    Runtime::run(args.runtime(), DemoApp::new(args.worker()))
}
