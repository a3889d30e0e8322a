use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use shared::domain::HealthStatus;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    form::{AnimalForm, FormField, AGE_MAX, AGE_MIN, WEIGHT_MIN},
    orchestration::{handle_event, perform},
    reducer::{TrackerState, UiAction, DELETE_CONFIRM_TITLE},
    table::{species_filter_options, SortColumn, TablePage, TableState},
};
use crate::ui::widgets::{self, PageAction};

pub const APP_TITLE: &str = "Animal Tracker";
const SUBTITLE: &str = "Keep track of animals you've observed or are monitoring";

/// Table interactions collected while painting and applied afterwards.
enum TableInput {
    Sort(SortColumn),
    ToggleSpecies(String),
    ResetSpecies,
    Page(PageAction),
}

pub struct TrackerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: TrackerState,
    jump_draft: String,
    source_label: String,
}

impl TrackerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        page_size: usize,
        source_label: String,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: TrackerState::new(TableState::new(page_size)),
            jump_draft: String::new(),
            source_label,
        };
        app.perform(UiAction::Mount);
        app
    }

    fn perform(&mut self, action: UiAction) {
        perform(&self.cmd_tx, &mut self.state, action);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            handle_event(&self.cmd_tx, &mut self.state, event);
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new(APP_TITLE).strong().size(26.0));
            if self.state.loading {
                ui.spinner();
            }
        });
        ui.label(egui::RichText::new(SUBTITLE).weak());
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("+ Add New Animal").clicked() {
                actions.push(UiAction::OpenCreate);
            }
            if ui
                .add_enabled(!self.state.loading, egui::Button::new("Refresh"))
                .clicked()
            {
                actions.push(UiAction::Reload);
            }
        });
        ui.add_space(8.0);
    }

    fn show_table(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let page = self.state.table.view(&self.state.animals);
        let species_options = species_filter_options(&self.state.animals);
        let sort = self.state.table.sort();
        let mut inputs = Vec::new();

        egui::ScrollArea::both()
            .auto_shrink([false, true])
            .max_height((ui.available_height() - 40.0).max(120.0))
            .show(ui, |ui| {
                egui::Grid::new("animal_table")
                    .striped(true)
                    .min_col_width(72.0)
                    .spacing([16.0, 8.0])
                    .show(ui, |ui| {
                        if widgets::sort_header(ui, "Name", sort.direction_for(SortColumn::Name))
                            .clicked()
                        {
                            inputs.push(TableInput::Sort(SortColumn::Name));
                        }
                        self.species_header(ui, &species_options, &mut inputs);
                        ui.strong("Breed");
                        if widgets::sort_header(ui, "Age", sort.direction_for(SortColumn::Age))
                            .clicked()
                        {
                            inputs.push(TableInput::Sort(SortColumn::Age));
                        }
                        ui.strong("Health");
                        ui.strong("Location");
                        ui.strong("Last Seen");
                        ui.strong("Actions");
                        ui.end_row();

                        self.table_rows(ui, &page, actions);
                    });

                if page.total == 0 {
                    ui.add_space(12.0);
                    ui.vertical_centered(|ui| {
                        if self.state.loading {
                            ui.spinner();
                        } else {
                            ui.label(egui::RichText::new("No data").weak());
                        }
                    });
                }
            });

        ui.separator();
        if let Some(action) = widgets::pagination_bar(ui, &page, &mut self.jump_draft) {
            inputs.push(TableInput::Page(action));
        }

        let table = &mut self.state.table;
        for input in inputs {
            match input {
                TableInput::Sort(column) => table.toggle_sort(column),
                TableInput::ToggleSpecies(species) => table.toggle_species(&species),
                TableInput::ResetSpecies => table.clear_species_filter(),
                TableInput::Page(PageAction::Previous) => table.previous_page(),
                TableInput::Page(PageAction::Next) => table.next_page(),
                TableInput::Page(PageAction::Jump(target)) => table.jump_to(target),
                TableInput::Page(PageAction::PageSize(size)) => table.set_page_size(size),
            }
        }
    }

    fn species_header(
        &self,
        ui: &mut egui::Ui,
        species_options: &[String],
        inputs: &mut Vec<TableInput>,
    ) {
        let active = self.state.table.species_filter().len();
        let label = if active == 0 {
            "Species ▾".to_string()
        } else {
            format!("Species ({active}) ▾")
        };
        ui.menu_button(egui::RichText::new(label).strong(), |ui| {
            if species_options.is_empty() {
                ui.label(egui::RichText::new("No species yet").weak());
            }
            for species in species_options {
                let mut checked = self.state.table.is_species_selected(species);
                if ui.checkbox(&mut checked, species.as_str()).changed() {
                    inputs.push(TableInput::ToggleSpecies(species.clone()));
                }
            }
            ui.separator();
            if ui.add_enabled(active > 0, egui::Button::new("Reset")).clicked() {
                inputs.push(TableInput::ResetSpecies);
                ui.close();
            }
        });
    }

    fn table_rows(&self, ui: &mut egui::Ui, page: &TablePage, actions: &mut Vec<UiAction>) {
        for (row, &source) in page.rows.iter().zip(&page.source_indices) {
            ui.label(row.name.as_str());
            ui.label(row.species.as_str());
            ui.label(row.breed.as_str());
            ui.label(row.age.as_str());
            widgets::health_tag(ui, &row.health, row.health_color);
            ui.label(row.location.as_str());
            ui.label(row.last_seen.as_str());
            ui.horizontal(|ui| {
                if ui.small_button("✏ Edit").clicked() {
                    if let Some(animal) = self.state.animals.get(source) {
                        actions.push(UiAction::Edit(animal.clone()));
                    }
                }
                let delete = egui::Button::new(
                    egui::RichText::new("🗑 Delete").color(egui::Color32::from_rgb(207, 19, 34)),
                )
                .small();
                if ui.add(delete).clicked() {
                    actions.push(UiAction::RequestDelete(row.id.clone()));
                }
            });
            ui.end_row();
        }
    }

    fn show_form_window(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let modal = self.state.modal();
        if !modal.is_open() {
            return;
        }
        let title = modal.title();
        let submit_label = modal.submit_label();
        let saving = self.state.save_in_flight();

        let mut open = true;
        egui::Window::new(title)
            .id(egui::Id::new("animal_form_window"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(420.0)
            .show(ctx, |ui| {
                let form = &mut self.state.form;
                egui::Grid::new("animal_form_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        text_row(ui, form, FormField::Name, true);
                        text_row(ui, form, FormField::Species, true);
                        text_row(ui, form, FormField::Breed, false);
                        number_row(ui, form, FormField::Age);
                        number_row(ui, form, FormField::Weight);
                        health_row(ui, form);
                        text_row(ui, form, FormField::Location, false);
                        text_row(ui, form, FormField::LastSeen, false);
                        text_row(ui, form, FormField::Notes, false);
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::Cancel);
                    }
                    if ui
                        .add_enabled(!saving, egui::Button::new(submit_label))
                        .clicked()
                    {
                        actions.push(UiAction::Submit);
                    }
                    if saving {
                        ui.spinner();
                    }
                });
            });

        if !open {
            actions.push(UiAction::Cancel);
        }
    }

    fn show_delete_confirm(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        if self.state.pending_delete().is_none() {
            return;
        }
        egui::Window::new("delete_confirm_window")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(DELETE_CONFIRM_TITLE).strong());
                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        actions.push(UiAction::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::DismissDelete);
                    }
                });
            });
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.small(egui::RichText::new(&self.source_label).weak());
            if !self.state.status.is_empty() {
                ui.separator();
                ui.small(egui::RichText::new(&self.state.status).weak());
            }
        });
    }
}

fn field_label(ui: &mut egui::Ui, field: FormField, required: bool) {
    if required {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("*").color(egui::Color32::from_rgb(255, 77, 79)));
            ui.label(field.label());
        });
    } else {
        ui.label(field.label());
    }
}

fn field_error(ui: &mut egui::Ui, form: &AnimalForm, field: FormField) {
    if let Some(message) = form.error_for(field) {
        ui.label("");
        ui.label(
            egui::RichText::new(message)
                .small()
                .color(egui::Color32::from_rgb(255, 77, 79)),
        );
        ui.end_row();
    }
}

fn text_row(ui: &mut egui::Ui, form: &mut AnimalForm, field: FormField, required: bool) {
    field_label(ui, field, required);
    let buffer = match field {
        FormField::Name => &mut form.name,
        FormField::Species => &mut form.species,
        FormField::Breed => &mut form.breed,
        FormField::Location => &mut form.location,
        FormField::LastSeen => &mut form.last_seen,
        FormField::Notes => &mut form.notes,
        FormField::Age | FormField::Weight | FormField::Health => return,
    };
    let edit = if field == FormField::Notes {
        egui::TextEdit::multiline(buffer).desired_rows(3)
    } else {
        egui::TextEdit::singleline(buffer)
    };
    if ui
        .add(edit.hint_text(field.placeholder()).desired_width(260.0))
        .changed()
    {
        form.clear_error(field);
    }
    ui.end_row();
    field_error(ui, form, field);
}

fn number_row(ui: &mut egui::Ui, form: &mut AnimalForm, field: FormField) {
    field_label(ui, field, false);
    let (current, range) = match field {
        FormField::Age => (form.age, AGE_MIN..=AGE_MAX),
        _ => (form.weight, WEIGHT_MIN..=f64::MAX),
    };
    let mut next = current;
    ui.horizontal(|ui| match current {
        Some(mut value) => {
            if ui
                .add(egui::DragValue::new(&mut value).range(range).speed(0.1))
                .changed()
            {
                next = Some(value);
            }
            if ui.small_button("Clear").clicked() {
                next = None;
            }
        }
        None => {
            if ui
                .add(egui::Button::new(egui::RichText::new(field.placeholder()).weak()))
                .clicked()
            {
                next = Some(0.0);
            }
        }
    });
    if next != current {
        match field {
            FormField::Age => form.set_age(next),
            _ => form.set_weight(next),
        }
    }
    ui.end_row();
}

fn health_row(ui: &mut egui::Ui, form: &mut AnimalForm) {
    field_label(ui, FormField::Health, false);
    let selected = form
        .health
        .clone()
        .unwrap_or_else(|| FormField::Health.placeholder().to_string());
    egui::ComboBox::from_id_salt("health_status_select")
        .selected_text(selected)
        .width(260.0)
        .show_ui(ui, |ui| {
            for status in HealthStatus::ALL {
                let value = Some(status.as_str().to_string());
                ui.selectable_value(&mut form.health, value, status.as_str());
            }
            ui.separator();
            ui.selectable_value(&mut form.health, None, "Clear");
        });
    ui.end_row();
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.state.notifications.prune(Instant::now());

        let mut actions = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.show_status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_header(ui, &mut actions);
            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::symmetric(12, 10))
                .show(ui, |ui| self.show_table(ui, &mut actions));
        });

        self.show_form_window(ctx, &mut actions);
        self.show_delete_confirm(ctx, &mut actions);

        if let Some(index) = widgets::toast_overlay(ctx, &self.state.notifications) {
            self.state.notifications.dismiss(index);
        }

        for action in actions {
            self.perform(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
