use crate::banner::BannerView;
use crate::settings;
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use mnemo_core as game;
use game::{Animation, Command, Event};
use std::fmt::Write;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Page {
    Landing,
    Playing,
}

/// Presentation state driven by the commands the game emits.
#[derive(Clone, Debug, PartialEq)]
struct ViewState {
    time_left: u32,
    banner_text: AttrValue,
    banner_shown: bool,
    dealt_round: u64,
    flipping: Option<game::CardId>,
}

impl ViewState {
    fn new(time_limit: u32) -> Self {
        Self {
            time_left: time_limit,
            banner_text: AttrValue::default(),
            banner_shown: false,
            dealt_round: 0,
            flipping: None,
        }
    }

    /// Applies a presentation command. Returns `false` for commands the host
    /// has to run itself.
    fn apply(&mut self, command: &Command, round: u64) -> bool {
        match command {
            Command::DisplayTime(time_left) => self.time_left = *time_left,
            Command::ShowMessage(text) => self.banner_text = AttrValue::from(text.clone()),
            Command::Animate(Animation::DealCards) => self.dealt_round = round,
            Command::Animate(Animation::FlipCard(id)) => self.flipping = Some(*id),
            Command::Animate(Animation::MessageIn) => self.banner_shown = true,
            Command::Animate(Animation::MessageOut) => self.banner_shown = false,
            Command::RenderGrid => self.flipping = None,
            Command::RenderCard(_) | Command::SetGridVisible(_) | Command::HideMessage => {}
            Command::StartTicking | Command::StopTicking | Command::Schedule { .. } => {
                return false;
            }
        }
        true
    }
}

fn grid_style(config: &game::GameConfig) -> String {
    let mut style = format!(
        "width: {}px; height: {}px; grid-template-columns: repeat({}, 1fr);",
        config.width, config.height, config.cols
    );
    if let Some(theme) = &config.theme {
        let _ = write!(
            style,
            " background: {}; color: {}; font-size: {};",
            theme.background, theme.color, theme.font_size
        );
    }
    style
}

fn grid_classes(session: &game::Game) -> Classes {
    use game::{Outcome, Phase};

    let mut class = classes!("grid");
    if session.grid().is_visible() {
        class.push("show");
    }
    class.push(match session.phase() {
        Phase::Idle => "idle",
        Phase::Previewing => "preview",
        Phase::Playing => "playable",
        Phase::Ended(Outcome::Win) => "win",
        Phase::Ended(Outcome::Lose) => "lose",
    });
    class
}

fn card_classes(active: bool, flipping: bool) -> Classes {
    let mut class = classes!("card");
    if active {
        class.push("active");
    }
    if flipping {
        class.push("flip");
    }
    class
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Enter,
    Restart,
    Game(Event),
    ToggleSettings,
    UpdateSettings(settings::Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    id: game::CardId,
    face: game::Face,
    #[prop_or_default]
    active: bool,
    #[prop_or_default]
    flipping: bool,
    callback: Callback<game::CardId>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        id,
        face,
        active,
        flipping,
        callback,
    } = props.clone();

    let class = card_classes(active, flipping);
    let label = face.to_string();
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", id);
        callback.emit(id);
    });

    html! {
        <div {class} data-number={label.clone()} data-active={active.to_string()} {onclick}>
            {label}
        </div>
    }
}

#[derive(Args, Properties, Debug, Default, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    pub seed: Option<String>,

    /// Number of grid columns
    #[arg(long)]
    #[prop_or_default]
    pub cols: Option<game::Dim>,

    /// Number of grid rows
    #[arg(long)]
    #[prop_or_default]
    pub rows: Option<game::Dim>,

    /// Countdown length in seconds
    #[arg(short, long)]
    #[prop_or_default]
    pub time_limit: Option<u32>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: settings::Settings,
    game: game::Game,
    page: Page,
    base_seed: Option<u64>,
    ticker: Option<Interval>,
    view: ViewState,
    settings_open: bool,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        match self.base_seed {
            Some(base) => round_seed(base, self.game.round().wrapping_add(1)),
            None => js_random_seed(),
        }
    }

    fn create_ticker(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(game::TICK_MS, move || link.send_message(Msg::Game(Event::Tick)))
    }

    /// One-shot delay that always runs to completion; the game ignores it if
    /// the round it belongs to is over.
    fn schedule(ctx: &Context<Self>, delay_ms: u32, event: Event) {
        let link = ctx.link().clone();
        Timeout::new(delay_ms, move || link.send_message(Msg::Game(event))).forget();
    }

    fn dispatch(&mut self, ctx: &Context<Self>, event: Event) -> bool {
        let commands = self.game.dispatch(event);
        self.run_commands(ctx, commands)
    }

    fn run_commands(&mut self, ctx: &Context<Self>, commands: Vec<Command>) -> bool {
        let updated = !commands.is_empty();
        let round = self.game.round();

        for command in commands {
            if self.view.apply(&command, round) {
                continue;
            }
            match command {
                Command::StartTicking => {
                    // replacing the interval drops, and so cancels, the previous one
                    self.ticker = Some(Self::create_ticker(ctx));
                }
                Command::StopTicking => {
                    self.ticker.take();
                }
                Command::Schedule { delay_ms, event } => Self::schedule(ctx, delay_ms, event),
                other => log::warn!("unhandled command: {:?}", other),
            }
        }
        updated
    }

    fn start_round(&mut self, ctx: &Context<Self>) -> bool {
        let seed = self.next_seed();
        log::debug!("starting round with seed {}", seed);
        self.dispatch(ctx, Event::Start { seed })
    }

    fn replace_settings(&mut self, ctx: &Context<Self>, settings: settings::Settings) -> bool {
        if self.settings == settings {
            return false;
        }
        settings.local_save();
        self.settings = settings;
        let commands = self.game.reconfigure(self.settings.game_config.clone());
        self.run_commands(ctx, commands);
        if self.page == Page::Playing {
            self.start_round(ctx);
        }
        true
    }

    fn view_landing(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::Enter);
        html! {
            <div class="first-page">
                <h1>{"Mnemo"}</h1>
                <p>{"Memorise the grid, then flip the pairs before time runs out."}</p>
                <button class="start-button" {onclick}>{"Start"}</button>
            </div>
        }
    }

    fn view_game(&self, ctx: &Context<Self>) -> Html {
        use settings::SettingsView;

        let config = self.game.config();
        let callback = ctx.link().callback(|id: game::CardId| Msg::Game(Event::FlipCard(id)));
        let onmouseenter = ctx.link().callback(|_: MouseEvent| Msg::Game(Event::PointerEnter));
        let onmouseleave = ctx.link().callback(|_: MouseEvent| Msg::Game(Event::PointerLeave));
        let cb_restart = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::Restart
        });
        let cb_settings = ctx.link().callback(|_: MouseEvent| Msg::ToggleSettings);
        let on_change = ctx.link().callback(Msg::UpdateSettings);
        let on_close = ctx.link().callback(|_: ()| Msg::ToggleSettings);

        let cards = self.game.grid().cards().iter().enumerate().map(|(id, card)| {
            let id = id as game::CardId;
            html! {
                <CardView
                    {id}
                    face={card.face()}
                    active={card.is_active()}
                    flipping={self.view.flipping == Some(id)}
                    callback={callback.clone()}
                />
            }
        });

        html! {
            <div class="mnemo second-page">
                <small onclick={cb_settings}>{"···"}</small>
                <nav>
                    <aside class="timer">{self.view.time_left.to_string()}</aside>
                    <button class="restart-button" onclick={cb_restart}>{"Restart"}</button>
                </nav>
                <BannerView text={self.view.banner_text.clone()} shown={self.view.banner_shown}/>
                <div
                    key={self.view.dealt_round.to_string()}
                    class={classes!(grid_classes(&self.game), "dealt")}
                    style={grid_style(config)}
                    {onmouseenter}
                    {onmouseleave}
                >
                    { for cards }
                </div>
                <SettingsView
                    open={self.settings_open}
                    current={self.settings.clone()}
                    {on_change}
                    {on_close}
                />
            </div>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let stored: settings::Settings = LocalOrDefault::local_or_default();
        let settings = stored.overridden(props.cols, props.rows, props.time_limit);
        let game = game::Game::new(settings.game_config.clone());
        let view = ViewState::new(settings.game_config.time_limit);

        Self {
            settings,
            game,
            page: Page::Landing,
            base_seed: props.seed.as_deref().map(seed_from_str),
            ticker: None,
            view,
            settings_open: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Enter => {
                log::debug!("entering game page");
                self.page = Page::Playing;
                self.start_round(ctx);
                true
            }
            Restart => self.start_round(ctx),
            Game(event) => self.dispatch(ctx, event),
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            UpdateSettings(settings) => self.replace_settings(ctx, settings),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match self.page {
            Page::Landing => self.view_landing(ctx),
            Page::Playing => self.view_game(ctx),
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        log::debug!("tearing down round {}", self.game.round());
        self.ticker.take();
    }
}
