//! Modal dialogs: user messages and the add-row form.

use egui::{Align2, Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

impl MessageKind {
    fn color(&self) -> Color32 {
        match self {
            MessageKind::Info => Color32::from_rgb(40, 167, 69),
            MessageKind::Warning => Color32::from_rgb(243, 156, 18),
            MessageKind::Error => Color32::from_rgb(220, 53, 69),
        }
    }
}

/// A message shown until the user dismisses it.
#[derive(Debug, Clone)]
pub struct MessageDialog {
    pub kind: MessageKind,
    pub title: String,
    pub text: String,
}

impl MessageDialog {
    pub fn info(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            title: title.to_string(),
            text: text.into(),
        }
    }

    pub fn warning(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Warning,
            title: title.to_string(),
            text: text.into(),
        }
    }

    pub fn error(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            title: title.to_string(),
            text: text.into(),
        }
    }

    /// Draw the dialog. Returns true once dismissed.
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut dismissed = false;
        egui::Window::new(RichText::new(&self.title).color(self.kind.color()))
            .id(egui::Id::new("message_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(5.0);
                ui.label(self.text.as_str());
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        dismissed
    }
}

/// Result of one frame of the add-row form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Pending,
    Submit(Vec<String>),
    Cancel,
}

/// One text field per column of the target dataset.
#[derive(Debug, Clone)]
pub struct AddRowForm {
    pub dataset: String,
    columns: Vec<String>,
    values: Vec<String>,
}

impl AddRowForm {
    pub fn new(dataset: &str, columns: Vec<String>) -> Self {
        let values = vec![String::new(); columns.len()];
        Self {
            dataset: dataset.to_string(),
            columns,
            values,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> FormOutcome {
        let mut outcome = FormOutcome::Pending;
        egui::Window::new(format!("Add a row to {}", self.dataset))
            .id(egui::Id::new("add_row_form"))
            .collapsible(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    egui::Grid::new("add_row_grid")
                        .num_columns(2)
                        .spacing([10.0, 6.0])
                        .show(ui, |ui| {
                            for (column, value) in self.columns.iter().zip(self.values.iter_mut()) {
                                ui.label(format!("Value for '{}':", column));
                                ui.text_edit_singleline(value);
                                ui.end_row();
                            }
                        });
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        outcome = FormOutcome::Submit(self.values.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = FormOutcome::Cancel;
                    }
                });
            });
        outcome
    }
}
