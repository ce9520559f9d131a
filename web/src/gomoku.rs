use crate::utils::*;
use arcade_core::gomoku::Gomoku;
use arcade_core::{Coord, Coord2, Player};
use yew::prelude::*;

pub(crate) enum Msg {
    Place(Coord2),
    NewGame,
    CloseDialog,
}

#[derive(Properties, Clone, PartialEq)]
struct PointProps {
    row: Coord,
    col: Coord,
    stone: Option<Player>,
    #[prop_or_default]
    last: bool,
    #[prop_or_default]
    winning: bool,
    onplace: Callback<Coord2>,
}

#[function_component(PointView)]
fn point_component(props: &PointProps) -> Html {
    let PointProps {
        row,
        col,
        stone,
        last,
        winning,
        onplace,
    } = props.clone();

    let class = classes!(
        "point",
        stone.map(|player| match player {
            Player::X => "black",
            Player::O => "white",
        }),
        last.then_some("last"),
        winning.then_some("winning")
    );
    let onclick = Callback::from(move |_: MouseEvent| onplace.emit((row, col)));

    html! { <td {class} {onclick}/> }
}

pub(crate) struct GomokuSession {
    game: Gomoku,
    dialog_open: bool,
}

impl GomokuSession {
    fn new() -> Self {
        Self {
            game: Gomoku::new(),
            dialog_open: false,
        }
    }

    /// Opens the winner dialog on the move that ends the game.
    fn place(&mut self, coords: Coord2) -> bool {
        let updated = self.game.place(coords).has_update();
        if let Some(winner) = self.game.winner().filter(|_| updated) {
            log::info!("gomoku won by {}", winner);
            self.dialog_open = true;
        }
        updated
    }

    fn new_game(&mut self) {
        *self = Self::new();
    }

    fn close_dialog(&mut self) -> bool {
        std::mem::take(&mut self.dialog_open)
    }
}

pub(crate) struct GomokuView {
    session: GomokuSession,
}

impl Component for GomokuView {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            session: GomokuSession::new(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Place(coords) => self.session.place(coords),
            Msg::NewGame => {
                self.session.new_game();
                true
            }
            Msg::CloseDialog => self.session.close_dialog(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let GomokuSession { game, dialog_open } = &self.session;
        let (rows, cols) = game.size();
        let last_move = game.last_move();
        let winning_line = game.winning_line();
        let onplace = ctx.link().callback(Msg::Place);
        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        let status = match game.winner() {
            Some(winner) => format!("Winner: {}", winner),
            None => format!("Next player: {}", game.current_player()),
        };

        html! {
            <div class="gomoku">
                <nav>
                    <span class="status">{status}</span>
                    <button onclick={cb_new_game.clone()}>{"New game"}</button>
                </nav>
                <table class={game.winner().is_none().then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        html! {
                                            <PointView
                                                {row}
                                                {col}
                                                stone={game.cell_at(pos)}
                                                last={last_move == Some(pos)}
                                                winning={winning_line.contains(&pos)}
                                                onplace={onplace.clone()}
                                            />
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let (true, Some(winner)) = (*dialog_open, game.winner()) {
                    <Modal>
                        <div class="dialog">
                            <p>{ format!("{} wins!", winner) }</p>
                            <button onclick={cb_new_game}>{"New game"}</button>
                            <button onclick={ctx.link().callback(|_: MouseEvent| Msg::CloseDialog)}>{"Close"}</button>
                        </div>
                    </Modal>
                }
            </div>
        }
    }
}
