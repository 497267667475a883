use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use gloo::utils::document;
use serde::{Deserialize, Serialize};
use toupeira_core as game;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_time::Instant;
use yew::prelude::*;

mod utils;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Msg {
    /// Activation event on a hole, with the platform's trust verdict.
    Whack { cell: game::CellId, trusted: bool },
    /// Start button: always (re)starts.
    Start,
    /// Start key: only starts when no session is running.
    StartIfIdle,
    /// A platform timer fired; run whatever the session has due.
    Advance,
}

#[derive(Properties, Clone, PartialEq)]
struct HoleProps {
    cell: game::CellId,
    #[prop_or_default]
    up: bool,
    callback: Callback<Msg>,
}

#[function_component(Hole)]
fn hole_component(props: &HoleProps) -> Html {
    let HoleProps { cell, up, callback } = props.clone();
    let class = classes!("hole", up.then_some("up"));

    let onclick = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            log::trace!("hole {} clicked (trusted: {})", game::display_index(cell), e.is_trusted());
            callback.emit(Msg::Whack {
                cell,
                trusted: e.is_trusted(),
            });
        })
    };

    // Enter or Space on a focused hole whacks it through the same trusted path
    let onkeydown = Callback::from(move |e: KeyboardEvent| {
        if utils::is_activation_key(&e.key()) {
            e.prevent_default();
            callback.emit(Msg::Whack {
                cell,
                trusted: e.is_trusted(),
            });
        }
    });

    html! {
        <td
            {class}
            tabindex="0"
            role="button"
            aria-label={utils::hole_aria_label(cell)}
            {onclick}
            {onkeydown}
        >
            <span class="hole-number">{game::display_index(cell)}</span>
            <div class="mole"/>
        </td>
    }
}

struct GameView {
    session: game::GameSession,
    origin: Instant,
    pending_wake: Option<Timeout>,
    pop_sound: Option<web_sys::HtmlAudioElement>,
    _keydown: EventListener,
}

impl GameView {
    // reference board is a 3-wide grid of holes
    const GRID_COLS: usize = 3;

    fn now_ms(&self) -> game::Millis {
        self.origin.elapsed().as_millis() as game::Millis
    }

    fn create_keydown_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            if utils::focus_in_text_entry() {
                return;
            }

            let key = event.key().to_lowercase();
            if key == "a" {
                link.send_message(Msg::StartIfIdle);
                return;
            }

            // digits 1-9 whack the matching hole, with the real event's trust
            if let Ok(digit) = key.parse::<u8>() {
                if (1..=9).contains(&digit) {
                    link.send_message(Msg::Whack {
                        cell: digit - 1,
                        trusted: event.is_trusted(),
                    });
                }
            }
        })
    }

    /// Re-arms the single platform timer at the session's next deadline.
    ///
    /// Dropping the previous handle cancels it, so there is never more than
    /// one pending wake-up no matter how often the session restarts.
    fn arm_wakeup(&mut self, ctx: &Context<Self>) {
        self.pending_wake = self.session.next_wakeup().map(|due_at| {
            let delay = due_at.saturating_sub(self.now_ms()) as u32;
            let link = ctx.link().clone();
            Timeout::new(delay, move || link.send_message(Msg::Advance))
        });
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = game::GameConfig::new(game::DEFAULT_CELL_COUNT, utils::game_duration_ms());
        Self {
            session: game::GameSession::new(config, utils::js_random_seed()),
            origin: Instant::now(),
            pending_wake: None,
            pop_sound: utils::load_pop_sound(),
            _keydown: GameView::create_keydown_listener(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Start => {
                self.session.start(self.now_ms());
                true
            }
            StartIfIdle => {
                if self.session.is_running() {
                    false
                } else {
                    self.session.start(self.now_ms());
                    true
                }
            }
            Advance => self.session.advance_to(self.now_ms()),
            Whack { cell, trusted } => {
                // settle anything already due so adjudication sees the
                // freshest board
                let advanced = self.session.advance_to(self.now_ms());
                let outcome = self.session.whack(cell, trusted);
                log::debug!("whack hole {}: {:?}", game::display_index(cell), outcome);
                if outcome.scored() {
                    utils::play_pop_sound(&self.pop_sound);
                }
                advanced | outcome.has_update()
            }
        };
        self.arm_wakeup(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let cells = self.session.cell_count();
        let running_class = classes!(self.session.is_running().then_some("running"));
        let cb_start = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Start
        });

        html! {
            <div class="toupeira">
                <nav>
                    <aside id="score">{self.session.score()}</aside>
                    <span>
                        <button id="startButton" class={running_class} onclick={cb_start}>
                            {"Start"}
                        </button>
                    </span>
                    <aside id="timer">{self.session.display_secs()}</aside>
                </nav>
                <table>
                    {
                        for (0..cells).step_by(GameView::GRID_COLS).map(|row_start| html! {
                            <tr>
                                {
                                    for (row_start..cells.min(row_start + GameView::GRID_COLS as game::CellId)).map(|cell| {
                                        let up = self.session.is_mole_up(cell).unwrap_or(false);
                                        let callback = ctx.link().callback(|msg| msg);
                                        html! {
                                            <Hole {cell} {up} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
            </div>
        }
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("Error initializing logger");
    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");
    log::info!("Application started");
    yew::Renderer::<GameView>::with_root(root).render();
}
