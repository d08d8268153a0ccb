//! Top-level screens: the menu and a running session.

use log::info;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{InputState, Sfx};
use crate::session::GameSession;

/// Discrete (key-down) input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Confirm,
    Cancel,
}

#[derive(Clone, Debug)]
pub enum Screen {
    Menu,
    Playing(GameSession),
}

#[derive(Clone, Debug)]
pub struct Game {
    pub config: GameConfig,
    pub screen: Screen,
    quit: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Game {
            config,
            screen: Screen::Menu,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.screen {
            Screen::Playing(session) => Some(session),
            Screen::Menu => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        match &mut self.screen {
            Screen::Playing(session) => Some(session),
            Screen::Menu => None,
        }
    }

    /// Apply one key-down action.
    ///
    /// Confirm starts a round from the menu and returns to the menu once the
    /// round is over; mid-round it does nothing.  Cancel quits from anywhere.
    pub fn handle(&mut self, action: Action, now: u64, rng: &mut impl Rng) {
        match action {
            Action::Cancel => {
                info!("quit requested");
                self.quit = true;
            }
            Action::Confirm => match self.session().map(|s| s.phase) {
                None => {
                    self.screen = Screen::Playing(GameSession::new(self.config.clone(), now, rng));
                }
                Some(phase) if phase.is_over() => {
                    info!("back to menu after {:?}", phase);
                    self.screen = Screen::Menu;
                }
                Some(_) => {}
            },
        }
    }

    pub fn tick(&mut self, input: &InputState, now: u64, rng: &mut impl Rng) {
        if let Screen::Playing(session) = &mut self.screen {
            session.tick(input, now, rng);
        }
    }

    pub fn take_sounds(&mut self) -> Vec<Sfx> {
        self.session_mut()
            .map(GameSession::take_sounds)
            .unwrap_or_default()
    }
}
