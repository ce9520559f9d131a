use crate::utils::*;
use arcade_core::sweeper::{
    EngineCell, EngineState, GameConfig, LayoutGenerator, MarkOutcome, PlayEngine,
    RandomLayoutGenerator,
};
use arcade_core::{Coord, Coord2};
use bitflags::bitflags;
use chrono::prelude::*;
use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

/// Hold time before a touch counts as a secondary click.
const LONG_PRESS_MS: u32 = 500;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredMine,
    Mine,
    Misflagged,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewGameState {
    Ready,
    Active,
    Won,
    Lost,
}

impl ViewGameState {
    fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SweeperSession {
    pub engine: PlayEngine,
    pub flag_mode: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub move_count: u32,
}

impl SweeperSession {
    fn new(seed: u64) -> Self {
        let layout = RandomLayoutGenerator::new(seed).generate(GameConfig::CLASSIC);
        Self::with_engine(PlayEngine::new(layout))
    }

    fn with_engine(engine: PlayEngine) -> Self {
        Self {
            engine,
            flag_mode: false,
            started_at: None,
            ended_at: None,
            move_count: 0,
        }
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn view_state(&self) -> ViewGameState {
        match self.engine.state() {
            EngineState::Ready => ViewGameState::Ready,
            EngineState::Active => ViewGameState::Active,
            EngineState::Won => ViewGameState::Won,
            EngineState::Lost => ViewGameState::Lost,
        }
    }

    fn cell_state_at(&self, coords: Coord2) -> ViewCellState {
        let engine_cell = self.engine.cell_at(coords);
        let has_mine = self.engine.has_mine_at(coords);

        match self.engine.state() {
            EngineState::Ready | EngineState::Active => Self::cell_state_active(engine_cell),
            // unflagged mines are shown flagged once the board is cleared
            EngineState::Won if has_mine => ViewCellState::Flagged,
            EngineState::Won => Self::cell_state_active(engine_cell),
            EngineState::Lost if self.engine.triggered_mine() == Some(coords) => {
                ViewCellState::TriggeredMine
            }
            EngineState::Lost => match (engine_cell, has_mine) {
                (EngineCell::Flagged, true) => ViewCellState::Flagged,
                (_, true) => ViewCellState::Mine,
                (EngineCell::Flagged, false) => ViewCellState::Misflagged,
                (cell, false) => Self::cell_state_active(cell),
            },
        }
    }

    fn cell_state_active(engine_cell: EngineCell) -> ViewCellState {
        match engine_cell {
            EngineCell::Hidden => ViewCellState::Hidden,
            EngineCell::Revealed(count) => ViewCellState::Revealed(count),
            EngineCell::Flagged => ViewCellState::Flagged,
        }
    }

    /// Primary action: reveal, chord on a satisfied number, or flag while in flag mode.
    fn primary_action(&mut self, coords: Coord2, now: DateTime<Utc>) -> bool {
        if self.flag_mode {
            return self.secondary_action(coords, now);
        }

        let updated = self.engine.open(coords).has_update();
        if updated {
            self.on_successful_move(now);
        }
        updated
    }

    /// Secondary action: toggle a flag, or flag around a number whose hidden neighbours must all be mines.
    fn secondary_action(&mut self, coords: Coord2, now: DateTime<Utc>) -> bool {
        let updated = match self.engine.toggle_flag(coords) {
            Ok(MarkOutcome::NoChange)
                if matches!(self.engine.cell_at(coords), EngineCell::Revealed(_)) =>
            {
                self.engine.chord_flag(coords).has_update()
            }
            outcome => outcome.has_update(),
        };
        if updated {
            self.on_successful_move(now);
        }
        updated
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        self.move_count = self.move_count.saturating_add(1);

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_finished() && self.ended_at.is_none() {
            log::info!(
                "minesweeper over: {:?} after {} moves",
                self.engine.state(),
                self.move_count
            );
            self.ended_at = Some(now);
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CellPointerState {
    pos: Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
    TouchStart(Coord2),
    TouchEnd(Coord2),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    LongPress(Coord2),
    UpdateTime,
    ToggleFlagMode,
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: Coord,
    col: Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    pressed: bool,
    #[prop_or_default]
    locked: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        row,
        col,
        cell_state,
        pressed,
        locked,
        callback,
    } = props.clone();
    let pos = (row, col);

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Flagged => classes!("flag"),
            TriggeredMine => classes!("open", "mine", "oops"),
            Mine => classes!("open", "mine"),
            Misflagged => classes!("flag", "wrong"),
        }
    );
    if pressed {
        class.push("open");
    }
    if locked {
        class.push("locked");
    }

    let pointer_callback = |name: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState { pos, buttons }));
            log::trace!("{:?} mouse {} ({:?})", pos, name, buttons);
        })
    };
    let onmousedown = pointer_callback("down");
    let onmouseup = pointer_callback("up");
    let onmouseenter = pointer_callback("enter");

    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| callback.emit(CellMsg::Leave))
    };

    let ontouchstart = {
        let callback = callback.clone();
        Callback::from(move |_: TouchEvent| callback.emit(CellMsg::TouchStart(pos)))
    };

    let ontouchend = Callback::from(move |e: TouchEvent| {
        // suppress the emulated mouse events that would click a second time
        e.prevent_default();
        callback.emit(CellMsg::TouchEnd(pos));
    });

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave} {ontouchstart} {ontouchend}/>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct SweeperProps {
    #[prop_or_default]
    pub seed: Option<u64>,
}

pub(crate) struct SweeperView {
    session: SweeperSession,
    seeds: SeedSource,
    prev_time: u32,
    current_cell_state: Option<CellPointerState>,
    touch_timer: Option<Timeout>,
    _timer_interval: Interval,
}

impl SweeperView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn get_time(&self) -> u32 {
        self.session.elapsed_secs(utc_now())
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn get_game_state_class(&self) -> Classes {
        let mid_open = self.is_mid_open();

        classes!(match self.session.view_state() {
            ViewGameState::Ready | ViewGameState::Active if mid_open => "mid-open",
            ViewGameState::Ready => "not-started",
            ViewGameState::Active => "in-progress",
            ViewGameState::Won => "win",
            ViewGameState::Lost => "lose",
        })
    }

    fn is_pressed(&self, coords: Coord2, cell_state: ViewCellState) -> bool {
        if self.session.view_state().is_finished() || self.session.flag_mode {
            return false;
        }

        const fn is_neighbor(a: Coord2, b: Coord2) -> bool {
            (a.0.abs_diff(b.0) <= 1) && (a.1.abs_diff(b.1) <= 1)
        }

        match (self.current_cell_state, cell_state) {
            (
                Some(CellPointerState {
                    pos,
                    buttons: MouseButtons::LEFT,
                }),
                ViewCellState::Hidden,
            ) if pos == coords => true,
            (
                Some(CellPointerState {
                    pos,
                    buttons: MouseButtons::LEFT,
                }),
                ViewCellState::Hidden,
            ) if is_neighbor(pos, coords) => self.session.engine.can_chord_at(pos),
            _ => false,
        }
    }

    fn on_pointer(&mut self, cell_state: CellPointerState) -> bool {
        if !cell_state.buttons.is_empty() {
            return match self.current_cell_state.replace(cell_state) {
                None => true,
                Some(CellPointerState { pos, buttons }) => {
                    (pos != cell_state.pos)
                        && ((buttons & MouseButtons::LEFT)
                            != (cell_state.buttons & MouseButtons::LEFT))
                }
            };
        }

        match self.current_cell_state.take() {
            None => false,
            Some(CellPointerState { pos, buttons }) => {
                match buttons {
                    MouseButtons::LEFT => {
                        log::debug!("primary click: {:?}", pos);
                        self.session.primary_action(pos, utc_now());
                    }
                    MouseButtons::RIGHT => {
                        log::debug!("secondary click: {:?}", pos);
                        self.session.secondary_action(pos, utc_now());
                    }
                    _ => {}
                }
                true
            }
        }
    }
}

impl Component for SweeperView {
    type Message = Msg;
    type Properties = SweeperProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut seeds = SeedSource::new(ctx.props().seed);
        Self {
            session: SweeperSession::new(seeds.next_seed()),
            seeds,
            prev_time: 0,
            current_cell_state: None,
            touch_timer: None,
            _timer_interval: SweeperView::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        match msg {
            CellEvent(Leave) => {
                log::trace!("cell leave");
                self.touch_timer = None;
                self.current_cell_state.take().is_some()
            }
            CellEvent(Update(cell_state)) => {
                log::trace!("cell update: {:?}", cell_state);
                self.on_pointer(cell_state)
            }
            CellEvent(TouchStart(pos)) => {
                let link = ctx.link().clone();
                self.touch_timer = Some(Timeout::new(LONG_PRESS_MS, move || {
                    link.send_message(LongPress(pos))
                }));
                false
            }
            // a pending timer means the long press has not fired yet; dropping it cancels it
            CellEvent(TouchEnd(pos)) if self.touch_timer.take().is_some() => {
                log::debug!("tap: {:?}", pos);
                self.session.primary_action(pos, utc_now())
            }
            CellEvent(TouchEnd(_)) => false,
            LongPress(pos) => {
                self.touch_timer = None;
                log::debug!("long press: {:?}", pos);
                self.session.secondary_action(pos, utc_now())
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            ToggleFlagMode => {
                self.session.flag_mode = !self.session.flag_mode;
                true
            }
            NewGame => {
                self.session = SweeperSession::new(self.seeds.next_seed());
                self.current_cell_state = None;
                self.touch_timer = None;
                self.prev_time = 0;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let (rows, cols) = self.session.engine.size();
        let game_state_class = self.get_game_state_class();
        let is_playable = !self.session.view_state().is_finished();
        let mines_left = format_for_counter(self.session.engine.mines_left() as i32);
        let elapsed_time = format_for_counter(self.get_time() as i32);
        let flag_mode = self.session.flag_mode;

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_flag_mode = ctx.link().callback(|_: MouseEvent| ToggleFlagMode);

        html! {
            <div class="minesweeper" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside title="Mines left">{mines_left}</aside>
                    <span><button class={game_state_class} title="Restart" onclick={cb_new_game}/></span>
                    <aside title="Time">{elapsed_time}</aside>
                </nav>
                <table class={is_playable.then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        let cell_state = self.session.cell_state_at(pos);
                                        let locked = !self.session.engine.can_interact_at(pos);
                                        let pressed = self.is_pressed(pos, cell_state);
                                        let callback = ctx.link().callback(Msg::CellEvent);
                                        html! {
                                            <CellView {row} {col} {cell_state} {callback} {pressed} {locked}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer>
                    <button class={classes!("flag-mode", flag_mode.then_some("active"))} onclick={cb_flag_mode}>
                        { if flag_mode { "Flag mode: on" } else { "Flag mode: off" } }
                    </button>
                </footer>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::sweeper::{MineLayout, RevealOutcome};

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn session(size: Coord2, mines: &[Coord2]) -> SweeperSession {
        SweeperSession::with_engine(PlayEngine::new(
            MineLayout::from_mine_coords(size, mines).unwrap(),
        ))
    }

    #[test]
    fn loss_maps_triggered_mine_other_mines_and_misflags() {
        let mut session = session((2, 2), &[(0, 0), (0, 1)]);

        assert!(session.primary_action((1, 1), t(0)));
        assert!(session.secondary_action((1, 0), t(1)));
        assert!(session.primary_action((0, 0), t(2)));

        assert_eq!(session.view_state(), ViewGameState::Lost);
        assert_eq!(session.cell_state_at((0, 0)), ViewCellState::TriggeredMine);
        assert_eq!(session.cell_state_at((0, 1)), ViewCellState::Mine);
        assert_eq!(session.cell_state_at((1, 0)), ViewCellState::Misflagged);
        assert_eq!(session.cell_state_at((1, 1)), ViewCellState::Revealed(2));
    }

    #[test]
    fn win_shows_every_mine_flagged() {
        let mut session = session((2, 1), &[(0, 0)]);

        assert!(session.primary_action((1, 0), t(0)));

        assert_eq!(session.view_state(), ViewGameState::Won);
        assert_eq!(session.cell_state_at((0, 0)), ViewCellState::Flagged);
    }

    #[test]
    fn flag_mode_turns_primary_into_flag() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.flag_mode = true;

        assert!(session.primary_action((2, 2), t(0)));
        assert_eq!(session.engine.cell_at((2, 2)), EngineCell::Flagged);
        assert_eq!(session.engine.revealed_count(), 0);

        assert!(session.primary_action((2, 2), t(1)));
        assert_eq!(session.engine.cell_at((2, 2)), EngineCell::Hidden);
    }

    #[test]
    fn primary_on_satisfied_number_chords() {
        let mut session = session((3, 3), &[(0, 0)]);
        assert_eq!(session.engine.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert!(session.secondary_action((0, 0), t(0)));

        assert!(session.primary_action((1, 1), t(1)));
        assert_eq!(session.view_state(), ViewGameState::Won);
    }

    #[test]
    fn clock_starts_on_first_move_and_stops_at_the_end() {
        let mut session = session((2, 2), &[(0, 0)]);
        assert_eq!(session.elapsed_secs(t(100)), 0);

        assert!(session.primary_action((1, 1), t(10)));
        assert_eq!(session.elapsed_secs(t(15)), 5);

        assert!(session.primary_action((0, 0), t(20)));
        assert_eq!(session.elapsed_secs(t(99)), 10);
        assert_eq!(session.move_count, 2);
    }

    #[test]
    fn rejected_moves_do_not_count() {
        let mut session = session((2, 2), &[(0, 0)]);
        assert!(!session.secondary_action((5, 5), t(0)));
        assert!(session.primary_action((1, 1), t(0)));
        assert!(!session.primary_action((1, 1), t(1)));
        assert_eq!(session.move_count, 1);
    }

    #[test]
    fn new_session_uses_classic_board() {
        let session = SweeperSession::new(42);
        assert_eq!(session.engine.size(), (10, 10));
        assert_eq!(session.engine.total_mines(), 10);
        assert_eq!(session.view_state(), ViewGameState::Ready);
        assert!(!session.flag_mode);
    }
}
