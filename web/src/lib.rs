use anyhow::{Context, anyhow};
use clap::Parser;
use wasm_bindgen::prelude::*;

mod banner;
mod game;
mod settings;
mod theme;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

/// Parses `#--cols=4&--rows=4&-vv` style location hashes.
fn parse_hash(hash: &str) -> anyhow::Result<Args> {
    Args::try_parse_from(hash.split(['#', '&'])).context("could not parse location hash")
}

fn init() -> anyhow::Result<()> {
    use gloo::utils::{document, window};

    let location_hash = window().location().hash().unwrap_or_default();
    let args = parse_hash(&location_hash)?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level)
            .map_err(|err| anyhow!("error initializing logger: {err}"))?;
    }
    log::debug!("args: {:?}", args.game);

    theme::Theme::init();

    let root = document()
        .get_element_by_id("game")
        .ok_or_else(|| anyhow!("could not find id=\"game\" element"))?;

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    if let Err(err) = init() {
        log::error!("{err:#}");
        gloo::console::error!(format!("mnemo failed to start: {err:#}"));
    }
}
