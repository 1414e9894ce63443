use clap::Parser;

use offcanvas_chart::WorkerConfig;
use offcanvas_engine::logging::LoggingConfig;
use offcanvas_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Animated scatter plot drawn on a renderer thread.
///
/// Press `B` to block the main thread with a modal dialog: the clock in the
/// title freezes, the plot does not. `Escape` quits.
#[derive(Debug, Clone, Parser)]
#[command(name = "offcanvas-demo", version, about)]
pub struct Args {
    /// Number of points to generate.
    ///
    /// Taken as-is: anything that is not a number falls back to 10000, and
    /// zero or negative values give an empty plot.
    ///
    /// Environment variable: `OFFCANVAS_COUNT`.
    #[arg(long, env = "OFFCANVAS_COUNT", allow_hyphen_values = true)]
    pub count: Option<String>,

    /// Fixed seed for the dataset.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter (env_logger syntax); overrides `RUST_LOG`.
    #[arg(long)]
    pub log: Option<String>,

    /// Initial window width, in logical pixels.
    #[arg(long, default_value_t = 960.0)]
    pub width: f64,

    /// Initial window height, in logical pixels.
    #[arg(long, default_value_t = 640.0)]
    pub height: f64,
}

impl Args {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..Default::default()
        }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: "offcanvas".to_owned(),
            initial_size: LogicalSize::new(self.width, self.height),
            ..Default::default()
        }
    }

    pub fn worker(&self) -> WorkerConfig {
        WorkerConfig {
            point_count: self.count.clone(),
            seed: self.seed,
            ..Default::default()
        }
    }
}
