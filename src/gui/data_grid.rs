//! Data Grid Widget
//! Virtualised table of the current dataset with sortable headers.

use crate::data::Dataset;
use egui::RichText;
use egui_extras::{Column, TableBuilder};

const ROW_NUMBER_WIDTH: f32 = 50.0;
const HEADER_HEIGHT: f32 = 24.0;

pub struct DataGrid;

impl DataGrid {
    /// Draw `dataset`; returns the column whose header was clicked.
    pub fn show(ui: &mut egui::Ui, dataset: &Dataset) -> Option<String> {
        let columns = dataset.column_names();
        if columns.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Empty dataset").size(20.0));
            });
            return None;
        }

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size;
        let row_height = text_height + 6.0;
        let mut clicked = None;

        ui.push_id(dataset.name(), |ui| {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .column(Column::exact(ROW_NUMBER_WIDTH))
                    .columns(Column::initial(110.0).at_least(40.0).clip(true), columns.len())
                    .header(HEADER_HEIGHT, |mut header| {
                        header.col(|ui| {
                            ui.strong("#");
                        });
                        for name in &columns {
                            header.col(|ui| {
                                let label = RichText::new(dataset.header_label(name)).strong();
                                if ui
                                    .button(label)
                                    .on_hover_text("Click to sort")
                                    .clicked()
                                {
                                    clicked = Some(name.clone());
                                }
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(row_height, dataset.row_count(), |mut row| {
                            let r = row.index();
                            row.col(|ui| {
                                ui.label(RichText::new((r + 1).to_string()).weak());
                            });
                            for c in 0..columns.len() {
                                row.col(|ui| {
                                    ui.label(dataset.cell_text(r, c));
                                });
                            }
                        });
                    });
            });
        });

        clicked
    }
}
