use crate::utils::*;
use arcade_core::tictactoe::{CELL_COUNT, TicTacToe};
use arcade_core::{Player, Status};
use yew::prelude::*;

pub(crate) enum Msg {
    Place(usize),
    NewGame,
}

fn banner(game: &TicTacToe) -> String {
    match (game.status(), game.winner()) {
        (Status::Won, Some(winner)) => format!("Winner: {}", winner),
        (Status::Draw, _) => "Draw!".to_string(),
        _ => format!("Next player: {}", game.current_player()),
    }
}

pub(crate) struct TicTacToeView {
    game: TicTacToe,
}

impl Component for TicTacToeView {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            game: TicTacToe::new(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Place(index) => self.game.place(index).has_update(),
            Msg::NewGame => {
                self.game = TicTacToe::new();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let winning_line = self.game.winning_line();

        html! {
            <div class="tictactoe">
                <p class="status">{banner(&self.game)}</p>
                <div class="board">
                    {
                        for (0..CELL_COUNT).map(|index| {
                            let stone = self.game.cell_at(index);
                            let class = classes!(
                                "square",
                                winning_line.is_some_and(|line| line.contains(&index)).then_some("winning")
                            );
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Place(index));
                            html! {
                                <button {class} {onclick}>{ stone.map(Player::symbol).unwrap_or_default() }</button>
                            }
                        })
                    }
                </div>
                <button onclick={ctx.link().callback(|_: MouseEvent| Msg::NewGame)}>{"New game"}</button>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_follows_the_game() {
        let mut game = TicTacToe::new();
        assert_eq!(banner(&game), "Next player: X");

        game.place(4).unwrap();
        assert_eq!(banner(&game), "Next player: O");

        for index in [0, 5, 1, 2, 3, 6, 7, 8] {
            game.place(index).unwrap();
        }
        // O O X / O X X / X _ _
        assert_eq!(banner(&game), "Winner: X");
    }

    #[test]
    fn banner_reports_draw() {
        let mut game = TicTacToe::new();
        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            game.place(index).unwrap();
        }
        assert_eq!(banner(&game), "Draw!");
    }
}
