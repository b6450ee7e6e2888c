use crate::theme::Theme;
use crate::utils::*;
use mnemo_core::{CardTheme, GameConfig};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

/// Grid presets offered in the settings dialog, as `(label, cols, rows, seconds)`.
pub(crate) const PRESETS: [(&str, u8, u8, u32); 4] = [
    ("Tiny", 2, 2, 10),
    ("Classic", 3, 2, 20),
    ("Odd", 3, 3, 30),
    ("Large", 4, 4, 45),
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub game_config: GameConfig,
}

impl Settings {
    pub(crate) fn with_preset(&self, cols: u8, rows: u8, time_limit: u32) -> Self {
        let theme = self.game_config.theme.clone().unwrap_or_default();
        let mut game_config = GameConfig::new(cols, rows, time_limit).with_theme(theme);
        game_config.width = self.game_config.width;
        game_config.height = self.game_config.height;
        Self { game_config }
    }

    /// Applies overrides from the location hash on top of the stored settings.
    pub(crate) fn overridden(
        &self,
        cols: Option<u8>,
        rows: Option<u8>,
        time_limit: Option<u32>,
    ) -> Self {
        let config = &self.game_config;
        let mut game_config = GameConfig::new(
            cols.unwrap_or(config.cols),
            rows.unwrap_or(config.rows),
            time_limit.unwrap_or(config.time_limit),
        );
        game_config.width = config.width;
        game_config.height = config.height;
        game_config.theme = Some(config.theme.clone().unwrap_or_else(CardTheme::default));
        Self { game_config }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "mnemo:settings";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub current: Settings,
    pub on_change: Callback<Settings>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let config = &props.current.game_config;

    let presets = PRESETS.iter().map(|&(label, cols, rows, time_limit)| {
        let selected = (config.cols, config.rows, config.time_limit) == (cols, rows, time_limit);
        let onclick = {
            let on_change = props.on_change.clone();
            let settings = props.current.with_preset(cols, rows, time_limit);
            Callback::from(move |_: MouseEvent| on_change.emit(settings.clone()))
        };
        html! {
            <li>
                <button class={classes!(selected.then_some("selected"))} {onclick}>
                    {format!("{label} {cols}×{rows} · {time_limit}s")}
                </button>
            </li>
        }
    });

    let themes = [("Auto", None), ("Light", Some(Theme::Light)), ("Dark", Some(Theme::Dark))]
        .into_iter()
        .map(|(label, theme)| {
            let onclick = Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                Theme::apply(theme);
            });
            html! { <li><a href="#" {onclick}>{label}</a></li> }
        });

    let onclose = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Settings"}</h2>
                <h3>{"Grid"}</h3>
                <ul>{ for presets }</ul>
                <h3>{"Theme"}</h3>
                <ul>{ for themes }</ul>
                <footer>
                    <button onclick={onclose}>{"Close"}</button>
                </footer>
            </article>
        </dialog>
    }
}
