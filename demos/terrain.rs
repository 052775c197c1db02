//! Opens a window with the reference scene.
//!
//! ```sh
//! cargo run --example terrain
//! HEXSCAPE_GROUND=heightmap cargo run --example terrain
//! HEXSCAPE_SEED=7 HEXSCAPE_ROWS=30 HEXSCAPE_COLUMNS=30 RUST_LOG=info cargo run --example terrain
//! ```

use hexscape::{EngineOptions, SceneConfig};

fn main() -> anyhow::Result<()> {
    let config = SceneConfig::from_env();
    let options = EngineOptions::from_env();
    hexscape::run(config, options)
}
