//! Control Panel Widget
//! Top bar with dataset selection, file loading and window launchers.

use crate::data::DatasetRegistry;
use egui::{Color32, ComboBox, RichText};

/// Top control bar.
pub struct ControlPanel {
    /// Separator typed by the user, parsed on load.
    pub separator: String,
    pub status: String,
    status_is_error: bool,
}

impl ControlPanel {
    pub fn new(default_separator: &str) -> Self {
        Self {
            separator: default_separator.to_string(),
            status: "Ready".to_string(),
            status_is_error: false,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = false;
    }

    /// Status shown in the error colour until the next `set_status`.
    pub fn set_error(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = true;
    }

    pub fn status_is_error(&self) -> bool {
        self.status_is_error
    }

    /// Draw the bar. `current` is the selected dataset, if any.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        registry: &DatasetRegistry,
        current: Option<&str>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("📊 CSV Dashboard")
                    .size(18.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.separator();

            ComboBox::from_id_salt("dataset_selector")
                .width(180.0)
                .selected_text(current.unwrap_or("No dataset"))
                .show_ui(ui, |ui| {
                    for dataset in registry.iter() {
                        let name = dataset.name();
                        let mut item = ui.selectable_label(current == Some(name), name);
                        if let Some(source) = dataset.source() {
                            item = item.on_hover_text(source.display().to_string());
                        }
                        if item.clicked() {
                            action = ControlPanelAction::SelectDataset(name.to_string());
                        }
                    }
                });

            if ui.button("📂 Add CSV file").clicked() {
                action = ControlPanelAction::AddCsv;
            }

            ui.label("Separator:");
            ui.add(egui::TextEdit::singleline(&mut self.separator).desired_width(30.0));

            ui.separator();

            if current.is_some() {
                if ui.button("📈 Advanced visualization").clicked() {
                    action = ControlPanelAction::OpenVisualizer;
                }
                if ui.button("📊 Advanced statistics").clicked() {
                    action = ControlPanelAction::OpenStatistics;
                }
                if ui.button("➕ Add row").clicked() {
                    action = ControlPanelAction::AddRow;
                }
            }

            if ui
                .add_enabled(!registry.is_empty(), egui::Button::new("⚖ Compare datasets"))
                .clicked()
            {
                action = ControlPanelAction::OpenComparator;
            }
        });

        let status_color = if self.status_is_error() {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by the control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    AddCsv,
    SelectDataset(String),
    OpenVisualizer,
    OpenStatistics,
    AddRow,
    OpenComparator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_colour_follows_the_setter_not_the_text() {
        let mut panel = ControlPanel::new(";");
        assert_eq!(panel.separator, ";");
        assert!(!panel.status_is_error());

        panel.set_status("Error_log.csv: 3 rows, 2 columns");
        assert!(!panel.status_is_error());

        panel.set_error("Error: invalid separator");
        assert!(panel.status_is_error());

        panel.set_status("sales.csv: 10 rows, 4 columns");
        assert!(!panel.status_is_error());
    }
}
