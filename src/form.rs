use std::collections::VecDeque;

use crate::catalog::{Catalog, Field};
use crate::config::{FORM_HEIGHT_MAX_CM, FORM_HEIGHT_MIN_CM};
use crate::filters::{self, Selection};
use crate::report::Report;
use crate::session;
use crate::tables::{Leg, Position};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Division,
    Zone,
    Club,
    Position,
    Leg,
    Height,
    Calculate,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Category,
        FormField::Division,
        FormField::Zone,
        FormField::Club,
        FormField::Position,
        FormField::Leg,
        FormField::Height,
        FormField::Calculate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Category => "Category",
            FormField::Division => "Division",
            FormField::Zone => "Zone",
            FormField::Club => "Club",
            FormField::Position => "Position",
            FormField::Leg => "Dominant leg",
            FormField::Height => "Height (m)",
            FormField::Calculate => "[ Calculate ]",
        }
    }

    fn cascade_index(self) -> Option<usize> {
        match self {
            FormField::Category => Some(0),
            FormField::Division => Some(1),
            FormField::Zone => Some(2),
            FormField::Club => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormResult {
    Report(Report),
    Message(String),
}

/// Widget values for the form surface. Terminal I/O lives with the binary.
#[derive(Debug, Clone)]
pub struct FormState {
    pub focus: usize,
    pub selection: Selection,
    pub cascade_options: [Vec<String>; 4],
    pub cascade_selected: [usize; 4],
    pub position_selected: usize,
    pub leg_selected: usize,
    pub height_cm: u16,
    pub default_height_cm: u16,
    pub result: Option<FormResult>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub should_quit: bool,
}

impl FormState {
    pub fn new(catalog: &Catalog, default_height_cm: u16) -> Self {
        let default_height_cm = default_height_cm.clamp(FORM_HEIGHT_MIN_CM, FORM_HEIGHT_MAX_CM);
        let mut state = Self {
            focus: 0,
            selection: Selection::new(),
            cascade_options: Default::default(),
            cascade_selected: [0; 4],
            position_selected: 0,
            leg_selected: 0,
            height_cm: default_height_cm,
            default_height_cm,
            result: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            should_quit: false,
        };
        state.refresh_cascade(catalog, 0);
        state
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus.min(FormField::ALL.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = if self.focus == 0 {
            FormField::ALL.len() - 1
        } else {
            self.focus - 1
        };
    }

    pub fn position(&self) -> Position {
        Position::ALL[self.position_selected % Position::ALL.len()]
    }

    pub fn leg(&self) -> Leg {
        Leg::ALL[self.leg_selected % Leg::ALL.len()]
    }

    pub fn height_m(&self) -> f64 {
        self.height_cm as f64 / 100.0
    }

    /// Current display value of `field`, `None` when it has nothing to offer.
    pub fn value(&self, field: FormField) -> Option<String> {
        if let Some(idx) = field.cascade_index() {
            return self.cascade_options[idx]
                .get(self.cascade_selected[idx])
                .cloned();
        }
        match field {
            FormField::Position => Some(self.position().label().to_string()),
            FormField::Leg => Some(self.leg().label().to_string()),
            FormField::Height => Some(format!("{:.2}", self.height_m())),
            _ => None,
        }
    }

    /// Steps the focused widget forward (`delta > 0`) or back.
    pub fn change_value(&mut self, catalog: &Catalog, delta: i32) {
        let field = self.focused();
        if let Some(idx) = field.cascade_index() {
            let len = self.cascade_options[idx].len();
            if len == 0 {
                return;
            }
            self.cascade_selected[idx] = step(self.cascade_selected[idx], len, delta);
            self.refresh_cascade(catalog, idx);
            self.result = None;
            return;
        }
        match field {
            FormField::Position => {
                self.position_selected = step(self.position_selected, Position::ALL.len(), delta)
            }
            FormField::Leg => self.leg_selected = step(self.leg_selected, Leg::ALL.len(), delta),
            FormField::Height => {
                let next = self.height_cm as i32 + delta.signum();
                self.height_cm =
                    next.clamp(FORM_HEIGHT_MIN_CM as i32, FORM_HEIGHT_MAX_CM as i32) as u16;
            }
            _ => return,
        }
        self.result = None;
    }

    /// Recomputes options for every cascade field from `from` on. Fields below
    /// `from` keep their pick; fields after it restart at their first option.
    pub fn refresh_cascade(&mut self, catalog: &Catalog, from: usize) {
        let from = from.min(Field::ORDER.len() - 1);
        if from == 0 {
            self.selection.clear();
        } else {
            self.selection.truncate_after(Field::ORDER[from - 1]);
        }

        let mut blocked = false;
        for (idx, field) in Field::ORDER.into_iter().enumerate().skip(from) {
            if blocked {
                self.cascade_options[idx].clear();
                self.cascade_selected[idx] = 0;
                continue;
            }
            let options = filters::options(catalog, field, &self.selection);
            if idx != from || self.cascade_selected[idx] >= options.len() {
                self.cascade_selected[idx] = 0;
            }
            match options.get(self.cascade_selected[idx]) {
                Some(value) => self.selection.set(field, value.clone()),
                None => blocked = true,
            }
            self.cascade_options[idx] = options;
        }
    }

    pub fn calculate(&mut self, catalog: &Catalog) {
        if let Some(missing) = self.selection.next_field() {
            let msg = format!("No {} available for the current selection.", missing.label());
            self.push_log(format!("[WARN] {msg}"));
            self.result = Some(FormResult::Message(msg));
            return;
        }
        match session::estimate_for_selection(
            catalog,
            &self.selection,
            self.position(),
            self.leg(),
            self.height_m(),
        ) {
            Ok(report) => {
                self.push_log(format!(
                    "[INFO] {} -> {:.4}%",
                    report.club.as_deref().unwrap_or("-"),
                    report.final_probability_pct
                ));
                self.result = Some(FormResult::Report(report));
            }
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                self.result = Some(FormResult::Message("Combination not found.".to_string()));
            }
        }
    }

    pub fn reset(&mut self, catalog: &Catalog) {
        self.focus = 0;
        self.cascade_selected = [0; 4];
        self.position_selected = 0;
        self.leg_selected = 0;
        self.height_cm = self.default_height_cm;
        self.result = None;
        self.refresh_cascade(catalog, 0);
        self.push_log("[INFO] Form reset");
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

fn step(current: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + delta as i64).rem_euclid(len) as usize
}
