use prepline_serve::ServeConfig;

/// `prepline serve` — flags override `PREPLINE_BIND` / `PREPLINE_PORT`.
pub fn execute(bind: Option<&str>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServeConfig::from_env();
    if let Some(bind) = bind {
        config.bind = bind.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }
    tokio::runtime::Runtime::new()?.block_on(prepline_serve::serve(config))
}
