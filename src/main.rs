//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` for a local preview of the landing page.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    preview::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::process::Command;

    use anyhow::{bail, Context};
    use tracing::{info, warn};

    const ADDR: &str = "127.0.0.1";
    const PORT: &str = "8000";

    pub fn run() -> anyhow::Result<()> {
        landing_wasm::logging::init();

        info!("building wasm package");
        match Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status()
        {
            Ok(status) if status.success() => {}
            Ok(status) => bail!("wasm-pack exited with {status}"),
            Err(err) => warn!(
                "wasm-pack not available ({err}); serving whatever is already in static/pkg"
            ),
        }

        info!("serving static/ at http://{ADDR}:{PORT}");
        let status = Command::new("python3")
            .args(["-m", "http.server", PORT, "--bind", ADDR, "--directory", "static"])
            .status()
            .context("failed to start python3 http.server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }
}
