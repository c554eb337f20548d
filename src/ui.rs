//! Scene composition
//!
//! Turns controller state into renderer calls. Each redraw paints the whole
//! frame: court first, then HUD text, then any menu on top.

use glam::Vec2;

use crate::consts::*;
use crate::game::{Controls, FinishAction, MatchOptions, MatchOutcome, MatchPhase, MatchState, Mode};
use crate::platform::{Anchor, Font, Renderer, TextPos};
use crate::sim::{Bounds, Court, Playfield, Rect};

/// Everything a redraw needs, borrowed from the controller
pub struct Scene<'a> {
    pub phase: MatchPhase,
    pub options: &'a MatchOptions,
    pub court: &'a Court,
    pub state: &'a MatchState,
    pub field: Playfield,
}

/// A two-option menu as shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuView {
    pub labels: [&'static str; 2],
    /// Index of the underlined label
    pub selected: usize,
    /// Show the PONG title above the options
    pub title: bool,
}

/// Menu shown in `phase`, with the selection taken from `options`
pub fn menu_for(phase: MatchPhase, options: &MatchOptions) -> Option<MenuView> {
    let (labels, second, title) = match phase {
        MatchPhase::MenuSelectMode => (["1 player", "2 player"], options.mode == Mode::TwoPlayer, true),
        MatchPhase::MenuSelectControls => {
            (["keyboard", "mouse"], options.controls == Controls::Pointer, true)
        }
        MatchPhase::MatchEnd => (["replay", "menu"], options.on_finish == FinishAction::Menu, false),
        _ => return None,
    };
    Some(MenuView {
        labels,
        selected: usize::from(second),
        title,
    })
}

/// Instructions shown before the serve
pub fn controls_hint(options: &MatchOptions) -> &'static str {
    match (options.mode, options.controls) {
        (Mode::TwoPlayer, _) => {
            "Player 1 controls: UP: w, DOWN: s\nPlayer 2 controls: UP: ArrowUp, DOWN: ArrowDown\nPress spacebar to begin."
        }
        (Mode::OnePlayer, Controls::Keyboard) => {
            "Controls: UP: ArrowUp, DOWN: ArrowDown\nPress spacebar to begin."
        }
        (Mode::OnePlayer, Controls::Pointer) => "Click to begin.",
    }
}

pub fn scoreline(court: &Court) -> String {
    let (left, right) = court.scores();
    format!("{} - {}", left, right)
}

pub fn draw_scene<R: Renderer + ?Sized>(r: &mut R, scene: &Scene) {
    r.clear();

    match scene.phase {
        MatchPhase::MenuSelectMode | MatchPhase::MenuSelectControls => {}
        MatchPhase::Playing | MatchPhase::RoundEnd => {
            draw_court(r, scene.court);
            draw_hud(r, scene);
        }
        MatchPhase::MatchEnd => {
            draw_court(r, scene.court);
            draw_match_end(r, scene);
        }
    }

    if let Some(menu) = menu_for(scene.phase, scene.options) {
        draw_menu(r, &menu, scene.field);
    }
}

fn draw_court<R: Renderer + ?Sized>(r: &mut R, court: &Court) {
    r.draw_rect(court.ball.rect(), FOREGROUND);
    r.draw_rect(court.left.rect(), FOREGROUND);
    r.draw_rect(court.right.rect(), FOREGROUND);
}

fn text_at<R: Renderer + ?Sized>(r: &mut R, text: &str, y: f32, size: f32) {
    r.draw_text(
        text,
        TextPos::new(Anchor::Center, Anchor::At(y)),
        Font::px(size),
        FOREGROUND,
    );
}

fn draw_hud<R: Renderer + ?Sized>(r: &mut R, scene: &Scene) {
    let idle = !scene.state.running;
    match scene.options.mode {
        Mode::OnePlayer => {
            text_at(r, &scene.state.rally.to_string(), RALLY_Y, RALLY_FONT_PX);
            if idle {
                text_at(r, controls_hint(scene.options), HINT_Y, HINT_FONT_PX);
                let best = format!("Max score: {}", scene.state.best_rally);
                text_at(r, &best, SCORE_Y, MENU_FONT_PX);
            }
        }
        Mode::TwoPlayer if idle => {
            if scene.court.scores() == (0, 0) {
                text_at(r, controls_hint(scene.options), HINT_Y, HINT_FONT_PX);
            } else {
                text_at(r, &scoreline(scene.court), SCORE_Y, SCORE_FONT_PX);
            }
        }
        Mode::TwoPlayer => {}
    }
}

fn draw_match_end<R: Renderer + ?Sized>(r: &mut R, scene: &Scene) {
    match scene.state.outcome {
        Some(MatchOutcome::RallyOver { rally, best, .. }) => {
            text_at(r, &rally.to_string(), RALLY_Y, RALLY_FONT_PX);
            text_at(r, &format!("Max score: {}", best), SCORE_Y, MENU_FONT_PX);
        }
        Some(outcome) => {
            text_at(r, &scoreline(scene.court), SCORE_Y, SCORE_FONT_PX);
            let banner = if outcome == MatchOutcome::LeftWins {
                "Player 1 wins the game!"
            } else {
                "Player 2 wins the game!"
            };
            r.draw_text(banner, TextPos::centered(), Font::px(BANNER_FONT_PX), FOREGROUND);
        }
        None => {}
    }
}

/// Options at the 1/4 and 3/4 marks; the selected one is underlined
fn draw_menu<R: Renderer + ?Sized>(r: &mut R, menu: &MenuView, field: Playfield) {
    if menu.title {
        r.draw_text("PONG", TextPos::centered(), Font::px(TITLE_FONT_PX), TITLE);
    }

    let font = Font::px(MENU_FONT_PX);
    let centers = [field.width / 4.0, field.width * 3.0 / 4.0];
    let mut underline = None;
    for (i, (label, center)) in menu.labels.iter().zip(centers).enumerate() {
        let width = r.measure_text(label, font);
        let x = center - width / 2.0;
        r.draw_text(label, TextPos::new(Anchor::At(x), Anchor::At(MENU_Y)), font, FOREGROUND);
        if i == menu.selected {
            underline = Some(Rect::new(
                Vec2::new(x, MENU_Y + font.size_px),
                Vec2::new(width, UNDERLINE_HEIGHT),
            ));
        }
    }
    if let Some(rect) = underline {
        r.draw_rect(rect, FOREGROUND);
    }
}
