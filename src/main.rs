use anyhow::{Context, Result};
use corner_grocer::{
    Args, CallBridge, Config, EditorInput, GROCER_MENU, GrocerMenu, LuaRuntime, Menu,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("corner_grocer=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env(argh::from_env::<Args>());
    tracing::debug!(?config, "configuration resolved");

    let runtime = LuaRuntime::new(config.module_dir.clone())
        .context("failed to set up the scripting runtime")?;
    let menu = Menu::new(GROCER_MENU).context("failed to build the menu")?;
    let grocer = GrocerMenu::new(CallBridge::new(&runtime, &config.module), menu, &config);

    let mut input = EditorInput::new().context("failed to open the console")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    grocer.run(&mut input, &mut out)
}
