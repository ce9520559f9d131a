use arcade_core::PlaceOutcome;
use arcade_core::sweeper::{MarkOutcome, RevealOutcome};
use std::fmt::Display;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Seeds for consecutive games of one view.
///
/// A forced seed (from `--seed`) makes every game reproducible: game `n` uses `seed + n`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SeedSource {
    forced: Option<u64>,
    games: u64,
}

impl SeedSource {
    pub(crate) fn new(forced: Option<u64>) -> Self {
        Self { forced, games: 0 }
    }

    pub(crate) fn next_seed(&mut self) -> u64 {
        let seed = match self.forced {
            Some(seed) => seed.wrapping_add(self.games),
            None => js_random_seed(),
        };
        self.games += 1;
        log::debug!("seed: {}", seed);
        seed
    }
}

pub(crate) fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

pub(crate) trait HasUpdate {
    fn has_update(self) -> bool;
}

macro_rules! impl_has_update {
    ($($outcome:ty),*) => {
        $(
            impl<E: Display> HasUpdate for Result<$outcome, E> {
                fn has_update(self) -> bool {
                    match self {
                        Ok(outcome) => outcome.has_update(),
                        Err(err) => {
                            log::error!("move rejected: {}", err);
                            false
                        }
                    }
                }
            }
        )*
    };
}

impl_has_update!(MarkOutcome, RevealOutcome, PlaceOutcome);
