use portal_view::{config::ViewerConfig, flow};

fn main() -> anyhow::Result<()> {
    let mut config = ViewerConfig::default();
    if let Some(level) = std::env::args().nth(1) {
        config = config.with_level(level);
    }
    flow::run(config)
}
