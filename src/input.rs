//! Input events and key/pointer mapping
//!
//! DOM listeners queue `RawInput` on the controller, which maps it to an
//! `InputEvent` with these functions as it drains the queue. Nothing here
//! touches the court directly.

use crate::game::{Controls, MatchOptions, MatchPhase, Mode};
use crate::sim::{Motion, Side};

/// Direction of travel through a two-option menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDirection {
    Left,
    Right,
}

/// Discrete input delivered to the match controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    SetPaddleVelocity { side: Side, motion: Motion },
    /// Pointer y in canvas coordinates (1-player pointer mode)
    PointerMoved { y: f32 },
    /// Serve the ball if the court is idle
    RequestStart,
    MenuNavigate(MenuDirection),
    MenuConfirm,
}

/// Browser input before mapping
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    KeyDown(String),
    KeyUp(String),
    PointerDown,
    PointerMove { y: f32 },
}

impl RawInput {
    /// Map against the phase in effect when the input is applied
    pub fn map(&self, phase: MatchPhase, options: &MatchOptions) -> Option<InputEvent> {
        match self {
            RawInput::KeyDown(key) => key_down(key, phase, options),
            RawInput::KeyUp(key) => key_up(key, phase, options),
            RawInput::PointerDown => pointer_down(phase, options),
            RawInput::PointerMove { y } => pointer_move(*y, phase, options),
        }
    }
}

fn paddle(side: Side, motion: Motion) -> Option<InputEvent> {
    Some(InputEvent::SetPaddleVelocity { side, motion })
}

/// Map a key press for the current phase and options
pub fn key_down(key: &str, phase: MatchPhase, options: &MatchOptions) -> Option<InputEvent> {
    if phase.is_menu() {
        return match key {
            "ArrowLeft" => Some(InputEvent::MenuNavigate(MenuDirection::Left)),
            "ArrowRight" => Some(InputEvent::MenuNavigate(MenuDirection::Right)),
            "Enter" => Some(InputEvent::MenuConfirm),
            _ => None,
        };
    }
    if phase != MatchPhase::Playing {
        return None;
    }

    match (options.mode, options.controls) {
        (Mode::TwoPlayer, _) => match key {
            "w" | "W" => paddle(Side::Left, Motion::Up),
            "s" | "S" => paddle(Side::Left, Motion::Down),
            "ArrowUp" => paddle(Side::Right, Motion::Up),
            "ArrowDown" => paddle(Side::Right, Motion::Down),
            " " => Some(InputEvent::RequestStart),
            _ => None,
        },
        (Mode::OnePlayer, Controls::Keyboard) => match key {
            "ArrowUp" => paddle(Side::Left, Motion::Up),
            "ArrowDown" => paddle(Side::Left, Motion::Down),
            " " => Some(InputEvent::RequestStart),
            _ => None,
        },
        (Mode::OnePlayer, Controls::Pointer) => None,
    }
}

/// Map a key release; releasing a movement key stops that paddle
pub fn key_up(key: &str, phase: MatchPhase, options: &MatchOptions) -> Option<InputEvent> {
    if phase != MatchPhase::Playing {
        return None;
    }

    match (options.mode, options.controls) {
        (Mode::TwoPlayer, _) => match key {
            "w" | "W" | "s" | "S" => paddle(Side::Left, Motion::Stop),
            "ArrowUp" | "ArrowDown" => paddle(Side::Right, Motion::Stop),
            _ => None,
        },
        (Mode::OnePlayer, Controls::Keyboard) => match key {
            "ArrowUp" | "ArrowDown" => paddle(Side::Left, Motion::Stop),
            _ => None,
        },
        (Mode::OnePlayer, Controls::Pointer) => None,
    }
}

fn pointer_active(phase: MatchPhase, options: &MatchOptions) -> bool {
    phase == MatchPhase::Playing
        && options.mode == Mode::OnePlayer
        && options.controls == Controls::Pointer
}

/// Click on the canvas serves in pointer mode
pub fn pointer_down(phase: MatchPhase, options: &MatchOptions) -> Option<InputEvent> {
    pointer_active(phase, options).then_some(InputEvent::RequestStart)
}

pub fn pointer_move(y: f32, phase: MatchPhase, options: &MatchOptions) -> Option<InputEvent> {
    pointer_active(phase, options).then_some(InputEvent::PointerMoved { y })
}

/// Keys the game reacts to in some phase; the shell suppresses their
/// default browser action (scrolling)
pub fn is_game_key(key: &str) -> bool {
    matches!(
        key,
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " " | "Enter" | "w" | "W" | "s" | "S"
    )
}

/// Mute toggle; handled by the shell, not the controller
pub fn is_mute_toggle(key: &str) -> bool {
    matches!(key, "m" | "M")
}
