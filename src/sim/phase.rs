//! Scripted level parts
//!
//! A level walks forward through its parts. Transition `i` leads from part `i`
//! to part `i + 1`; reaching the part after the last transition ends the level.
//! At most one transition fires per evaluation.

use serde::{Deserialize, Serialize};

/// Dialog variant shown by the host UI
pub type DialogId = u8;

/// Narrative parts, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Part {
    PartOne,
    PartTwo,
    PartThree,
    PartFour,
    PartFive,
}

impl Part {
    pub const ALL: [Part; 5] = [
        Part::PartOne,
        Part::PartTwo,
        Part::PartThree,
        Part::PartFour,
        Part::PartFive,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Part> {
        Self::ALL.get(index).copied()
    }
}

/// Condition for leaving the current part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Guard {
    /// Score has reached the threshold
    Score(u32),
    /// Seconds spent in the current part
    Elapsed(f32),
    /// The tracked enemy has moved `offset` units behind the craft
    EnemyPassed { offset: f32 },
}

/// One-shot side effect applied on entering the next part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEffect {
    UnlockDragonAttack,
    ActivateBot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub guard: Guard,
    #[serde(default)]
    pub effect: Option<PhaseEffect>,
    #[serde(default)]
    pub dialog: Option<DialogId>,
}

impl Transition {
    pub fn new(guard: Guard) -> Self {
        Self {
            guard,
            effect: None,
            dialog: None,
        }
    }

    pub fn with_effect(mut self, effect: PhaseEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_dialog(mut self, dialog: DialogId) -> Self {
        self.dialog = Some(dialog);
        self
    }
}

/// Everything a guard may look at
#[derive(Debug, Clone, Copy)]
pub struct GuardInputs {
    pub score: u32,
    pub craft_x: f32,
    pub enemy_x: Option<f32>,
}

impl Guard {
    pub fn is_met(&self, inputs: &GuardInputs, part_elapsed: f32) -> bool {
        match *self {
            Guard::Score(threshold) => inputs.score >= threshold,
            Guard::Elapsed(seconds) => part_elapsed >= seconds,
            Guard::EnemyPassed { offset } => inputs
                .enemy_x
                .is_some_and(|x| x < inputs.craft_x - offset),
        }
    }
}

/// Result of a transition firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartEntered {
    pub from: Part,
    pub to: Part,
    pub effect: Option<PhaseEffect>,
    pub dialog: Option<DialogId>,
    /// The new part ends the level
    pub terminal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMachine {
    pub part: Part,
    /// Seconds since the current part began
    pub part_elapsed: f32,
    /// Dialog currently on screen
    pub dialog: Option<DialogId>,
    /// Seconds until the dialog closes
    pub move_timer: f32,
    script: Vec<Transition>,
    dialog_seconds: f32,
}

impl PhaseMachine {
    pub fn new(script: Vec<Transition>, dialog_seconds: f32) -> Self {
        Self {
            part: Part::PartOne,
            part_elapsed: 0.0,
            dialog: None,
            move_timer: 0.0,
            script,
            dialog_seconds,
        }
    }

    /// A dialog is visible
    #[inline]
    pub fn screen_on(&self) -> bool {
        self.dialog.is_some()
    }

    /// The level ends in the current part
    pub fn is_terminal(&self) -> bool {
        !self.script.is_empty() && self.part.index() == self.script.len()
    }

    /// Completed share of the script, 0 for endless levels
    pub fn progress(&self) -> f32 {
        if self.script.is_empty() {
            0.0
        } else {
            self.part.index() as f32 / self.script.len() as f32
        }
    }

    /// Advance countdowns; returns true when the dialog just closed
    pub fn tick_timers(&mut self, dt: f32) -> bool {
        self.part_elapsed += dt;
        if self.dialog.is_some() {
            self.move_timer -= dt;
            if self.move_timer <= 0.0 {
                self.dialog = None;
                self.move_timer = 0.0;
                return true;
            }
        }
        false
    }

    /// Fire the current part's transition if its guard holds
    pub fn evaluate(&mut self, inputs: &GuardInputs) -> Option<PartEntered> {
        let index = self.part.index();
        let transition = self.script.get(index)?;
        if !transition.guard.is_met(inputs, self.part_elapsed) {
            return None;
        }

        let from = self.part;
        let to = Part::from_index(index + 1)?;
        let entered = PartEntered {
            from,
            to,
            effect: transition.effect,
            dialog: transition.dialog,
            terminal: index + 1 == self.script.len(),
        };

        self.part = to;
        self.part_elapsed = 0.0;
        if let Some(dialog) = entered.dialog {
            self.dialog = Some(dialog);
            self.move_timer = self.dialog_seconds;
        }
        Some(entered)
    }

    pub fn reset(&mut self) {
        self.part = Part::PartOne;
        self.part_elapsed = 0.0;
        self.dialog = None;
        self.move_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(score: u32) -> GuardInputs {
        GuardInputs {
            score,
            craft_x: 160.0,
            enemy_x: None,
        }
    }

    fn machine() -> PhaseMachine {
        PhaseMachine::new(
            vec![
                Transition::new(Guard::Score(3)).with_dialog(1),
                Transition::new(Guard::Elapsed(2.0)),
                Transition::new(Guard::EnemyPassed { offset: 0.0 })
                    .with_effect(PhaseEffect::UnlockDragonAttack),
            ],
            3.0,
        )
    }

    #[test]
    fn test_score_guard_opens_dialog() {
        let mut m = machine();
        assert_eq!(m.evaluate(&inputs(2)), None);
        let entered = m.evaluate(&inputs(3)).expect("transition");
        assert_eq!(entered.from, Part::PartOne);
        assert_eq!(entered.to, Part::PartTwo);
        assert!(!entered.terminal);
        assert!(m.screen_on());
        assert_eq!(m.move_timer, 3.0);
    }

    #[test]
    fn test_one_transition_per_evaluation() {
        let mut m = PhaseMachine::new(
            vec![Transition::new(Guard::Score(1)), Transition::new(Guard::Score(2))],
            3.0,
        );
        // Both thresholds already met: only the first fires
        assert!(m.evaluate(&inputs(5)).is_some());
        assert_eq!(m.part, Part::PartTwo);
        assert!(m.evaluate(&inputs(5)).expect("second").terminal);
        assert_eq!(m.part, Part::PartThree);
        assert!(m.is_terminal());
        assert_eq!(m.evaluate(&inputs(5)), None);
    }

    #[test]
    fn test_elapsed_guard_counts_from_part_entry() {
        let mut m = machine();
        m.tick_timers(5.0);
        m.evaluate(&inputs(3));
        assert_eq!(m.part, Part::PartTwo);
        assert_eq!(m.part_elapsed, 0.0);
        m.tick_timers(1.5);
        assert_eq!(m.evaluate(&inputs(3)), None);
        m.tick_timers(0.5);
        assert!(m.evaluate(&inputs(3)).is_some());
    }

    #[test]
    fn test_enemy_guard_needs_an_enemy_behind_the_craft() {
        let mut m = machine();
        m.part = Part::PartThree;
        assert_eq!(m.evaluate(&inputs(0)), None);
        let ahead = GuardInputs {
            enemy_x: Some(300.0),
            ..inputs(0)
        };
        assert_eq!(m.evaluate(&ahead), None);
        let behind = GuardInputs {
            enemy_x: Some(150.0),
            ..inputs(0)
        };
        let entered = m.evaluate(&behind).expect("transition");
        assert_eq!(entered.effect, Some(PhaseEffect::UnlockDragonAttack));
        assert!(entered.terminal);
    }

    #[test]
    fn test_dialog_auto_closes() {
        let mut m = machine();
        m.evaluate(&inputs(3));
        assert!(!m.tick_timers(2.0));
        assert!(m.screen_on());
        assert!(m.tick_timers(1.0));
        assert!(!m.screen_on());
    }

    #[test]
    fn test_endless_script_never_moves() {
        let mut m = PhaseMachine::new(Vec::new(), 3.0);
        assert_eq!(m.evaluate(&inputs(100)), None);
        assert!(!m.is_terminal());
        assert_eq!(m.progress(), 0.0);
    }
}
