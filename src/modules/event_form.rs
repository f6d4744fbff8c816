//! Create-event form overlay

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{Action, Module};
use crate::domain::{EventDraft, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    StartDate,
    StartTime,
    EndDate,
    EndTime,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::StartDate,
        FormField::StartTime,
        FormField::EndDate,
        FormField::EndTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title *",
            FormField::Description => "Description",
            FormField::StartDate => "Start date *",
            FormField::StartTime => "Start time",
            FormField::EndDate => "End date *",
            FormField::EndTime => "End time",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Title => "Enter event title",
            FormField::Description => "Enter event description",
            FormField::StartDate | FormField::EndDate => "YYYY-MM-DD",
            FormField::StartTime | FormField::EndTime => "HH:MM",
        }
    }

    fn step(&self, forward: bool) -> FormField {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ALL[next]
    }
}

#[derive(Debug, Clone)]
pub struct EventForm {
    pub draft: EventDraft,
    pub field: FormField,
    pub error: Option<ValidationError>,
    pub server_error: Option<String>,
    pub submitting: bool,
}

impl Default for EventForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EventForm {
    pub fn new() -> Self {
        Self {
            draft: EventDraft::default(),
            field: FormField::Title,
            error: None,
            server_error: None,
            submitting: false,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.draft.title,
            FormField::Description => &self.draft.description,
            FormField::StartDate => &self.draft.start_date,
            FormField::StartTime => &self.draft.start_time,
            FormField::EndDate => &self.draft.end_date,
            FormField::EndTime => &self.draft.end_time,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.draft.title,
            FormField::Description => &mut self.draft.description,
            FormField::StartDate => &mut self.draft.start_date,
            FormField::StartTime => &mut self.draft.start_time,
            FormField::EndDate => &mut self.draft.end_date,
            FormField::EndTime => &mut self.draft.end_time,
        }
    }

    /// The server rejected the submission; keep the draft for another try
    pub fn apply_failure(&mut self, message: String) {
        self.submitting = false;
        self.server_error = Some(message);
    }

    fn submit(&mut self) -> Action {
        if self.submitting {
            return Action::None;
        }
        match self.draft.validate() {
            Ok(event) => {
                self.error = None;
                self.server_error = None;
                self.submitting = true;
                Action::Submit(event)
            }
            Err(err) => {
                self.error = Some(err);
                Action::None
            }
        }
    }
}

impl Module for EventForm {
    fn id(&self) -> &'static str {
        "event-form"
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => self.submit(),
                KeyCode::Char('u') => {
                    self.value_mut(self.field).clear();
                    Action::None
                }
                _ => Action::None,
            };
        }
        match key.code {
            KeyCode::Esc => Action::CloseOverlay,
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.step(true);
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.step(false);
                Action::None
            }
            KeyCode::Enter => {
                if self.field == FormField::EndTime {
                    self.submit()
                } else {
                    self.field = self.field.step(true);
                    Action::None
                }
            }
            KeyCode::Backspace => {
                self.value_mut(self.field).pop();
                self.error = None;
                Action::None
            }
            KeyCode::Char(c) if !self.submitting => {
                self.value_mut(self.field).push(c);
                self.error = None;
                Action::None
            }
            _ => Action::None,
        }
    }
}
