// src/gui/components/query_panel.rs
//
// Left panel: what to scrape and how far to go.

use std::path::Path;

use eframe::egui;

use crate::{
    config::{consts::SETTINGS_FILE, settings},
    gui::{actions, app::App},
    model::Source,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Search");
    ui.add_space(4.0);

    ui.add_enabled_ui(!app.running, |ui| {
        let sc = &mut app.state.options.scrape;

        ui.label("Source:");
        for src in Source::ALL {
            if ui.radio_value(&mut sc.source, src, src.label()).changed() {
                logf!("UI: source → {}", src.label());
            }
        }

        ui.separator();

        if sc.source == Source::Website {
            ui.label("Start URL:");
            ui.add(
                egui::TextEdit::singleline(&mut app.state.gui.url_text)
                    .hint_text("https://example.com")
                    .font(egui::TextStyle::Monospace),
            );
            ui.horizontal(|ui| {
                ui.label("Depth:");
                ui.add(egui::DragValue::new(&mut sc.depth).range(0..=5));
            });
            ui.horizontal(|ui| {
                ui.label("Max pages:");
                ui.add(egui::DragValue::new(&mut sc.max_site_pages).range(1..=500));
            });
        } else {
            ui.label("Niche / search term:");
            ui.add(egui::TextEdit::singleline(&mut app.state.gui.query_text).hint_text("mining equipment"));
            ui.horizontal(|ui| {
                ui.label("Result pages:");
                ui.add(egui::DragValue::new(&mut sc.max_pages).range(1..=100));
            });
            ui.checkbox(&mut sc.follow_websites, "Follow company websites");
            ui.add_enabled(
                sc.follow_websites,
                egui::Checkbox::new(&mut sc.only_missing, "Only when no email found"),
            );
        }

        ui.checkbox(&mut sc.respect_robots, "Respect robots.txt");
    });

    ui.separator();

    ui.horizontal(|ui| {
        let red = egui::Color32::from_rgb(220, 30, 30);
        let black = egui::Color32::BLACK;
        let button = egui::Button::new(egui::RichText::new("SCRAPE").color(black).strong()).fill(red);
        if ui.add_enabled(!app.running, button).clicked() {
            actions::scrape(app);
        }
        if app.running {
            ui.spinner();
        }
    });

    ui.add_space(8.0);

    if ui.button("Save settings").clicked() {
        let cfg = settings::Settings::from_options(&app.state.options);
        match settings::save(Path::new(SETTINGS_FILE), &cfg) {
            Ok(()) => {
                logf!("Settings: saved → {SETTINGS_FILE}");
                app.status(format!("Settings saved to {SETTINGS_FILE}"));
            }
            Err(e) => {
                loge!("Settings: save failed: {}", e);
                app.status(format!("Settings error: {e}"));
            }
        }
    }
}
