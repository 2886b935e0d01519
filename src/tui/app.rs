use crate::insights::clamp_top_n;
use crate::scoring::{RankedUseCase, ScoreBreakdown, WEIGHT_STEP};
use crate::session::Session;
use crate::tui::theme::ThemeColors;
use crate::usecase::{Factor, Field, UseCase};
use std::time::Instant;

const NEW_USE_CASE_NAME: &str = "New use case";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    UseCases,
    Ranking,
    Summary,
}

impl View {
    pub const ALL: [View; 3] = [View::UseCases, View::Ranking, View::Summary];

    pub fn title(self) -> &'static str {
        match self {
            View::UseCases => "Use Cases",
            View::Ranking => "Ranking",
            View::Summary => "Summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Edit,
    Help,
    ScoreBreakdown,
}

/// In-progress edit of one row, one field at a time.
///
/// Changes collect in `draft` and reach the session only on confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub index: usize,
    pub field: Field,
    pub buffer: String,
    pub draft: UseCase,
    /// Row was appended for this edit and goes away on cancel
    pub is_new: bool,
}

pub struct App {
    pub session: Session,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub edit: Option<EditState>,
    pub selected_weight: Factor,
    pub top_n: usize,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(session: Session, top_n: usize) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !session.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            session,
            table_state,
            current_view: View::UseCases,
            input_mode: InputMode::Normal,
            edit: None,
            selected_weight: Factor::BusinessValue,
            top_n,
            flash_message: None,
            should_quit: false,
            theme: ThemeColors::dark(),
        }
    }

    /// Ranked rows recomputed from the current session.
    pub fn ranked(&self) -> Vec<RankedUseCase> {
        self.session.ranked()
    }

    /// Top-N after clamping to the current table size.
    pub fn effective_top_n(&self) -> usize {
        clamp_top_n(self.top_n, self.session.len())
    }

    /// Number of selectable rows in the current view.
    pub fn row_count(&self) -> usize {
        match self.current_view {
            View::UseCases | View::Ranking => self.session.len(),
            View::Summary => self.effective_top_n(),
        }
    }

    pub fn next_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Session index of the selected row. Ranked views map the selected
    /// position back to the row's insertion index.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.table_state.selected()?;
        match self.current_view {
            View::UseCases => (selected < self.session.len()).then_some(selected),
            View::Ranking | View::Summary => self.ranked().get(selected).map(|r| r.index),
        }
    }

    pub fn selected_use_case(&self) -> Option<&UseCase> {
        self.selected_index()
            .and_then(|i| self.session.use_cases().get(i))
    }

    /// Keep the selection inside the current view after rows change.
    fn clamp_selection(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(selected) if selected >= len => self.table_state.select(Some(len - 1)),
                None => self.table_state.select(Some(0)),
                _ => {}
            }
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Cycle Use Cases -> Ranking -> Summary
    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::UseCases => View::Ranking,
            View::Ranking => View::Summary,
            View::Summary => View::UseCases,
        };

        if self.row_count() == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_weight(&mut self, factor: Factor) {
        self.selected_weight = factor;
    }

    /// Move the selected weight by `steps` slider steps and report the new value
    pub fn adjust_selected_weight(&mut self, steps: i32) {
        let factor = self.selected_weight;
        self.session.adjust_weight(factor, steps);
        let weight = self.session.weights().get(factor);
        tracing::debug!(factor = factor.label(), weight, "weight adjusted");
        self.show_flash(format!(
            "{} weight: {:.1} (step {})",
            factor.label(),
            weight,
            WEIGHT_STEP
        ));
    }

    /// Append a blank row and open it for editing
    pub fn add_use_case(&mut self) {
        let use_case = UseCase {
            name: NEW_USE_CASE_NAME.to_string(),
            ..UseCase::default()
        };
        let index = self.session.add_use_case(use_case);

        // Jump to the table view so the new row is visible while editing
        self.current_view = View::UseCases;
        self.table_state.select(Some(index));
        self.start_edit();
        if let Some(edit) = self.edit.as_mut() {
            edit.is_new = true;
        }
    }

    /// Remove the selected row
    pub fn delete_selected(&mut self) {
        if self.current_view == View::Summary {
            return;
        }
        let Some(index) = self.selected_index() else {
            return;
        };
        if let Some(removed) = self.session.remove_use_case(index) {
            self.clamp_selection();
            self.show_flash(format!("Removed: {}", removed.name));
        }
    }

    /// Start editing the selected row at its first field
    pub fn start_edit(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let Some(use_case) = self.session.use_cases().get(index) else {
            return;
        };
        let field = Field::Name;
        self.edit = Some(EditState {
            index,
            field,
            buffer: field.get(use_case),
            draft: use_case.clone(),
            is_new: false,
        });
        self.input_mode = InputMode::Edit;
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer.push(c);
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer.pop();
        }
    }

    /// Move the edit buffer into the draft row
    fn stage_field(edit: &mut EditState) {
        edit.field.set(&mut edit.draft, &edit.buffer);
    }

    /// Keep the current field and move to the next (or previous) one
    pub fn edit_cycle_field(&mut self, forward: bool) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        Self::stage_field(edit);
        edit.field = if forward {
            edit.field.next()
        } else {
            edit.field.previous()
        };
        edit.buffer = edit.field.get(&edit.draft);
    }

    /// Write the draft row into the session and close the editor
    pub fn confirm_edit(&mut self) {
        if let Some(mut edit) = self.edit.take() {
            Self::stage_field(&mut edit);
            let name = edit.draft.name.clone();
            let out_of_range = edit.draft.out_of_range_factors();
            if self.session.replace_use_case(edit.index, edit.draft) {
                if out_of_range.is_empty() {
                    self.show_flash(format!("Updated: {}", name));
                } else {
                    let labels: Vec<&str> = out_of_range.iter().map(|f| f.label()).collect();
                    self.show_flash(format!(
                        "Updated: {} (outside 1-5: {})",
                        name,
                        labels.join(", ")
                    ));
                }
            }
        }
        self.input_mode = InputMode::Normal;
    }

    /// Drop the draft and close the editor. A row added for this edit is removed.
    pub fn cancel_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            if edit.is_new {
                self.session.remove_use_case(edit.index);
                self.clamp_selection();
            }
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn increase_top_n(&mut self) {
        let len = self.session.len();
        if len == 0 {
            return;
        }
        self.top_n = clamp_top_n(self.effective_top_n() + 1, len);
        self.show_flash(format!("Showing top {}", self.top_n));
    }

    pub fn decrease_top_n(&mut self) {
        let len = self.session.len();
        if len == 0 {
            return;
        }
        self.top_n = clamp_top_n(self.effective_top_n().saturating_sub(1), len);
        self.clamp_selection();
        self.show_flash(format!("Showing top {}", self.top_n));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show score breakdown overlay
    pub fn show_score_breakdown(&mut self) {
        if self.selected_index().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    /// Dismiss score breakdown overlay
    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Breakdown for the selected row under the current weights
    pub fn selected_breakdown(&self) -> Option<ScoreBreakdown> {
        self.selected_index().and_then(|i| self.session.breakdown(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::WeightSet;
    use crate::seed::default_use_cases;

    fn app() -> App {
        App::new(Session::new(default_use_cases(), WeightSet::default()), 5)
    }

    #[test]
    fn test_new_selects_first_row() {
        assert_eq!(app().table_state.selected(), Some(0));
        let empty = App::new(Session::new(Vec::new(), WeightSet::default()), 5);
        assert_eq!(empty.table_state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(3));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_toggle_view_cycles() {
        let mut app = app();
        app.toggle_view();
        assert_eq!(app.current_view, View::Ranking);
        app.toggle_view();
        assert_eq!(app.current_view, View::Summary);
        app.toggle_view();
        assert_eq!(app.current_view, View::UseCases);
    }

    #[test]
    fn test_selected_index_maps_ranking_to_session() {
        let mut app = app();
        app.toggle_view();
        // Knowledge retrieval (row 3) ranks first under default weights
        assert_eq!(app.selected_index(), Some(3));
        assert_eq!(
            app.selected_use_case().unwrap().name,
            "Internal knowledge retrieval assistant"
        );
    }

    #[test]
    fn test_adjust_weight_changes_ranking() {
        let mut app = app();
        app.select_weight(Factor::TechnicalFeasibility);
        for _ in 0..5 {
            app.adjust_selected_weight(-1);
        }
        assert_eq!(app.session.weights().feasibility, 0.0);
        app.select_weight(Factor::BusinessValue);
        app.adjust_selected_weight(4);
        assert_eq!(app.session.weights().value, 5.0);
        let ranked = app.ranked();
        assert_eq!(
            ranked[0].scored.use_case.name,
            "Intelligent document triage for claims"
        );
        assert!(app.flash_message.is_some());
    }

    #[test]
    fn test_add_use_case_opens_editor() {
        let mut app = app();
        app.toggle_view();
        app.add_use_case();
        assert_eq!(app.session.len(), 5);
        assert_eq!(app.current_view, View::UseCases);
        assert_eq!(app.table_state.selected(), Some(4));
        assert_eq!(app.input_mode, InputMode::Edit);
        let edit = app.edit.as_ref().unwrap();
        assert_eq!(edit.index, 4);
        assert_eq!(edit.buffer, NEW_USE_CASE_NAME);
    }

    #[test]
    fn test_edit_cycle_and_confirm() {
        let mut app = app();
        app.start_edit();
        for _ in 0..app.edit.as_ref().unwrap().buffer.len() {
            app.edit_backspace();
        }
        for c in "Claims".chars() {
            app.edit_push(c);
        }
        app.edit_cycle_field(true);
        assert_eq!(app.edit.as_ref().unwrap().draft.name, "Claims");
        // Nothing reaches the session before confirm
        assert_eq!(
            app.session.use_cases()[0].name,
            "Intelligent document triage for claims"
        );
        assert_eq!(
            app.edit.as_ref().unwrap().field,
            Field::Rating(Factor::BusinessValue)
        );
        assert_eq!(app.edit.as_ref().unwrap().buffer, "5");

        app.edit_backspace();
        app.edit_push('9');
        app.confirm_edit();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.edit.is_none());
        assert_eq!(app.session.use_cases()[0].name, "Claims");
        assert_eq!(app.session.use_cases()[0].value(Factor::BusinessValue), 9.0);
        let (msg, _) = app.flash_message.as_ref().unwrap();
        assert!(msg.contains("outside 1-5: Business Value"));
    }

    #[test]
    fn test_cancel_edit_discards_buffer() {
        let mut app = app();
        app.start_edit();
        app.edit_push('!');
        app.cancel_edit();
        assert_eq!(app.session.use_cases()[0].name, "Intelligent document triage for claims");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_cancel_after_cycling_restores_row() {
        let mut app = app();
        let before = app.session.use_cases()[0].clone();
        app.start_edit();
        app.edit_push('X');
        app.edit_cycle_field(true);
        app.edit_backspace();
        app.edit_push('1');
        app.edit_cycle_field(false);
        app.cancel_edit();

        assert_eq!(app.session.use_cases()[0], before);
        assert_eq!(app.session.len(), 4);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_cancel_new_row_removes_it() {
        let mut app = app();
        app.add_use_case();
        assert_eq!(app.session.len(), 5);
        app.edit_cycle_field(true);
        app.edit_push('4');
        app.cancel_edit();

        assert_eq!(app.session.len(), 4);
        assert!(app
            .session
            .use_cases()
            .iter()
            .all(|u| u.name != NEW_USE_CASE_NAME));
        assert_eq!(app.table_state.selected(), Some(3));
        assert_eq!(app.ranked().len(), 4);
    }

    #[test]
    fn test_confirm_new_row_keeps_it() {
        let mut app = app();
        app.add_use_case();
        app.confirm_edit();
        assert_eq!(app.session.len(), 5);
        assert_eq!(app.session.use_cases()[4].name, NEW_USE_CASE_NAME);
    }

    #[test]
    fn test_delete_selected_clamps_selection() {
        let mut app = app();
        app.previous_row(); // last row
        app.delete_selected();
        assert_eq!(app.session.len(), 3);
        assert_eq!(app.table_state.selected(), Some(2));

        for _ in 0..3 {
            app.delete_selected();
        }
        assert!(app.session.is_empty());
        assert_eq!(app.table_state.selected(), None);
        assert!(app.ranked().is_empty());
    }

    #[test]
    fn test_delete_in_ranking_removes_ranked_row() {
        let mut app = app();
        app.toggle_view();
        app.delete_selected();
        assert!(app
            .session
            .use_cases()
            .iter()
            .all(|u| u.name != "Internal knowledge retrieval assistant"));
    }

    #[test]
    fn test_top_n_clamped() {
        let mut app = app();
        assert_eq!(app.effective_top_n(), 4);
        app.increase_top_n();
        assert_eq!(app.top_n, 4);
        for _ in 0..10 {
            app.decrease_top_n();
        }
        assert_eq!(app.top_n, 1);
    }

    #[test]
    fn test_breakdown_overlay_requires_selection() {
        let mut empty = App::new(Session::new(Vec::new(), WeightSet::default()), 5);
        empty.show_score_breakdown();
        assert_eq!(empty.input_mode, InputMode::Normal);

        let mut app = app();
        app.show_score_breakdown();
        assert_eq!(app.input_mode, InputMode::ScoreBreakdown);
        let b = app.selected_breakdown().unwrap();
        assert!((b.priority_score - 16.0 / 12.0).abs() < 1e-12);
    }
}
