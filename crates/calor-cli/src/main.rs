//! `calor`: run the distributed heat diffusion and write `initial.dat`
//! and `final.dat`.
//!
//! ```bash
//! calor        # one compute thread per worker
//! calor 4      # four compute threads per worker
//! CALOR_WORKERS=8 RUST_LOG=debug calor
//! ```

use std::process::ExitCode;

use calor_cli::app;
use calor_cli::settings::SettingsLoader;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    ExitCode::from(app::execute(std::env::args_os(), SettingsLoader::new()))
}
