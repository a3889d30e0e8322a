//! Small reusable widgets for the tracker view.

use crate::controller::{
    notifications::{NotificationQueue, ToastLevel},
    table::{SortDirection, TablePage, TagColor, PAGE_SIZE_OPTIONS},
};

fn tag_palette(color: TagColor) -> (egui::Color32, egui::Color32) {
    match color {
        TagColor::Green => (
            egui::Color32::from_rgb(246, 255, 237),
            egui::Color32::from_rgb(56, 158, 13),
        ),
        TagColor::Orange => (
            egui::Color32::from_rgb(255, 247, 230),
            egui::Color32::from_rgb(212, 107, 8),
        ),
        TagColor::Red => (
            egui::Color32::from_rgb(255, 241, 240),
            egui::Color32::from_rgb(207, 19, 34),
        ),
        TagColor::Blue => (
            egui::Color32::from_rgb(230, 244, 255),
            egui::Color32::from_rgb(9, 88, 217),
        ),
    }
}

pub fn health_tag(ui: &mut egui::Ui, label: &str, color: TagColor) {
    let (fill, text) = tag_palette(color);
    egui::Frame::NONE
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, text.gamma_multiply(0.5)))
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(6, 1))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(label).color(text).small());
        });
}

/// Clickable column header; the arrow reflects the current sort on that column.
pub fn sort_header(
    ui: &mut egui::Ui,
    label: &str,
    direction: Option<SortDirection>,
) -> egui::Response {
    let arrow = match direction {
        Some(SortDirection::Ascending) => " ⬆",
        Some(SortDirection::Descending) => " ⬇",
        None => " ⬍",
    };
    ui.add(egui::Button::new(egui::RichText::new(format!("{label}{arrow}")).strong()).frame(false))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
    Jump(usize),
    PageSize(usize),
}

pub fn pagination_bar(
    ui: &mut egui::Ui,
    page: &TablePage,
    jump_draft: &mut String,
) -> Option<PageAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.label(page.summary());
        ui.separator();

        if ui.add_enabled(page.page > 1, egui::Button::new("‹")).clicked() {
            action = Some(PageAction::Previous);
        }
        ui.label(format!("{} / {}", page.page, page.page_count.max(1)));
        if ui
            .add_enabled(page.page < page.page_count, egui::Button::new("›"))
            .clicked()
        {
            action = Some(PageAction::Next);
        }

        ui.separator();
        let mut page_size = page.page_size;
        egui::ComboBox::from_id_salt("page_size_selector")
            .selected_text(format!("{page_size} / page"))
            .show_ui(ui, |ui| {
                for option in PAGE_SIZE_OPTIONS {
                    ui.selectable_value(&mut page_size, option, format!("{option} / page"));
                }
            });
        if page_size != page.page_size {
            action = Some(PageAction::PageSize(page_size));
        }

        ui.label("Go to");
        let response = ui.add(egui::TextEdit::singleline(jump_draft).desired_width(36.0));
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            if let Ok(target) = jump_draft.trim().parse::<usize>() {
                action = Some(PageAction::Jump(target));
            }
            jump_draft.clear();
        }
    });
    action
}

/// Renders toasts bottom-right; returns the index the user dismissed, if any.
pub fn toast_overlay(ctx: &egui::Context, notifications: &NotificationQueue) -> Option<usize> {
    if notifications.is_empty() {
        return None;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toast_overlay"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (index, toast) in notifications.toasts().iter().enumerate() {
                let (fill, stroke) = match toast.level {
                    ToastLevel::Success => (
                        egui::Color32::from_rgb(40, 96, 54),
                        egui::Color32::from_rgb(92, 168, 110),
                    ),
                    ToastLevel::Error => (
                        egui::Color32::from_rgb(111, 53, 53),
                        egui::Color32::from_rgb(175, 96, 96),
                    ),
                };
                egui::Frame::NONE
                    .fill(fill)
                    .stroke(egui::Stroke::new(1.0, stroke))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(&toast.message).color(egui::Color32::WHITE),
                            );
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(index);
                            }
                        });
                    });
                ui.add_space(6.0);
            }
        });
    dismissed
}
