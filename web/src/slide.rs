use crate::utils::*;
use arcade_core::Status;
use arcade_core::slide::{Direction, Game2048, RandomSpawner, SlideOutcome, Tile};
use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use yew::prelude::*;

fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        _ => None,
    }
}

fn tile_class(tile: Tile) -> Classes {
    match tile {
        0 => classes!("tile"),
        2..=2048 => classes!("tile", format!("tile-{}", tile)),
        _ => classes!("tile", "tile-super"),
    }
}

pub(crate) struct SlideSession {
    game: Game2048,
    spawner: RandomSpawner,
}

impl SlideSession {
    fn new(seed: u64) -> Self {
        let mut spawner = RandomSpawner::new(seed);
        let game = Game2048::new(&mut spawner);
        Self { game, spawner }
    }

    fn reset(&mut self, seed: u64) {
        log::debug!("new 2048 game, seed {}", seed);
        *self = Self::new(seed);
    }

    fn make_move(&mut self, direction: Direction) -> SlideOutcome {
        let outcome = self.game.make_move(direction, &mut self.spawner);
        log::trace!("{:?}: {:?}", direction, outcome);
        if outcome == SlideOutcome::GameOver {
            log::info!(
                "2048 over: score {} after {} moves",
                self.game.score(),
                self.game.move_count()
            );
        }
        outcome
    }
}

pub(crate) enum Msg {
    Move(Direction),
    NewGame,
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct SlideProps {
    #[prop_or_default]
    pub seed: Option<u64>,
}

pub(crate) struct SlideView {
    session: SlideSession,
    seeds: SeedSource,
    _keydown: EventListener,
}

impl SlideView {
    fn listen_for_arrows(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        let options = EventListenerOptions::enable_prevent_default();
        EventListener::new_with_options(&gloo::utils::window(), "keydown", options, move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(direction) = direction_for_key(&event.key()) {
                // keep the page from scrolling
                event.prevent_default();
                link.send_message(Msg::Move(direction));
            }
        })
    }
}

impl Component for SlideView {
    type Message = Msg;
    type Properties = SlideProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut seeds = SeedSource::new(ctx.props().seed);
        Self {
            session: SlideSession::new(seeds.next_seed()),
            seeds,
            _keydown: Self::listen_for_arrows(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Move(direction) => self.session.make_move(direction).has_update(),
            Msg::NewGame => {
                self.session.reset(self.seeds.next_seed());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let game = &self.session.game;
        let board = game.board();
        let (rows, cols) = board.size();
        let last_spawn = game.last_spawn();
        let game_over = game.status() == Status::Lost;

        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <div class="slide">
                <nav>
                    <aside title="Score">{game.score()}</aside>
                    <button onclick={cb_new_game.clone()}>{"New game"}</button>
                </nav>
                <div class="grid">
                    {
                        for (0..rows).map(|row| html! {
                            <div class="row">
                                {
                                    for (0..cols).map(|col| {
                                        let tile = board.tile_at((row, col));
                                        let mut class = tile_class(tile);
                                        if last_spawn == Some((row, col)) {
                                            class.push("new");
                                        }
                                        html! {
                                            <div {class}>{ if tile != 0 { tile.to_string() } else { String::new() } }</div>
                                        }
                                    })
                                }
                            </div>
                        })
                    }
                </div>
                if game_over {
                    <Modal>
                        <div class="dialog">
                            <p>{ format!("Game over! Score: {}", game.score()) }</p>
                            <button onclick={cb_new_game}>{"Try again"}</button>
                        </div>
                    </Modal>
                }
            </div>
        }
    }
}
