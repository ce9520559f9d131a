use crate::gomoku::GomokuView;
use crate::slide::SlideView;
use crate::sweeper::SweeperView;
use crate::tictactoe::TicTacToeView;
use gloo::events::EventListener;
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    Slide,
    Sweeper,
    Gomoku,
    TicTacToe,
}

impl Route {
    const ALL: [Self; 4] = [Self::Slide, Self::Sweeper, Self::Gomoku, Self::TicTacToe];

    const fn path(self) -> &'static str {
        match self {
            Self::Slide => "/2048",
            Self::Sweeper => "/minesweeper",
            Self::Gomoku => "/gomoku",
            Self::TicTacToe => "/tictactoe",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Slide => "2048",
            Self::Sweeper => "Minesweeper",
            Self::Gomoku => "Gomoku",
            Self::TicTacToe => "Tic-Tac-Toe",
        }
    }

    /// Unknown paths fall back to 2048, which is also the landing page.
    pub(crate) fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/2048" => Self::Slide,
            "/minesweeper" => Self::Sweeper,
            "/gomoku" => Self::Gomoku,
            "/tictactoe" => Self::TicTacToe,
            other => {
                log::warn!("unknown route {:?}, showing 2048", other);
                Self::Slide
            }
        }
    }

    /// Parses `#/path&--flags`, ignoring everything after the first `&`.
    pub(crate) fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').split('&').next().unwrap_or_default();
        Self::from_path(path)
    }
}

#[derive(Properties, Clone, PartialEq)]
struct SidebarProps {
    current: Route,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let open = use_state(|| true);
    let toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };

    html! {
        <aside class={classes!("sidebar", (!*open).then_some("collapsed"))}>
            <button class="toggle" title="Menu" onclick={toggle}>{"☰"}</button>
            <nav>
                {
                    for Route::ALL.into_iter().map(|route| html! {
                        <a
                            href={format!("#{}", route.path())}
                            class={(route == props.current).then_some("active")}
                        >
                            {route.label()}
                        </a>
                    })
                }
            </nav>
        </aside>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    pub route: Route,
    #[prop_or_default]
    pub seed: Option<u64>,
}

pub(crate) enum Msg {
    HashChanged,
}

pub(crate) struct App {
    route: Route,
    _hashchange: EventListener,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let hashchange = EventListener::new(&gloo::utils::window(), "hashchange", move |_| {
            link.send_message(Msg::HashChanged)
        });

        Self {
            route: ctx.props().route,
            _hashchange: hashchange,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::HashChanged => {
                let hash = gloo::utils::window().location().hash().unwrap_or_default();
                let route = Route::from_hash(&hash);
                log::debug!("route: {:?}", route);
                std::mem::replace(&mut self.route, route) != route
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let seed = ctx.props().seed;

        html! {
            <div class="arcade">
                <Sidebar current={self.route}/>
                <main>
                    {
                        match self.route {
                            Route::Slide => html! { <SlideView {seed}/> },
                            Route::Sweeper => html! { <SweeperView {seed}/> },
                            Route::Gomoku => html! { <GomokuView/> },
                            Route::TicTacToe => html! { <TicTacToeView/> },
                        }
                    }
                </main>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
            assert_eq!(Route::from_hash(&format!("#{}", route.path())), route);
        }
    }

    #[test]
    fn root_and_unknown_paths_land_on_2048() {
        assert_eq!(Route::from_path("/"), Route::Slide);
        assert_eq!(Route::from_path(""), Route::Slide);
        assert_eq!(Route::from_hash(""), Route::Slide);
        assert_eq!(Route::from_path("/chess"), Route::Slide);
    }

    #[test]
    fn flags_after_the_path_are_ignored() {
        assert_eq!(Route::from_hash("#/gomoku&-vv"), Route::Gomoku);
        assert_eq!(Route::from_hash("#/minesweeper/&--seed&7"), Route::Sweeper);
    }
}
