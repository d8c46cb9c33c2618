use eframe::egui;

use crate::common::{ConnectionState, SessionIdentity};

pub fn render(
    ui: &mut egui::Ui,
    state: ConnectionState,
    identity: &SessionIdentity,
    hint: Option<&str>,
) {
    ui.horizontal(|ui| {
        let color = match state {
            ConnectionState::Connected => egui::Color32::GREEN,
            ConnectionState::Connecting => egui::Color32::YELLOW,
            ConnectionState::Disconnected => egui::Color32::RED,
        };
        ui.colored_label(color, "●");
        ui.label(state.label());
        ui.separator();
        ui.label(egui::RichText::new(identity.display_name()).weak());

        if let Some(hint) = hint {
            ui.separator();
            ui.label(egui::RichText::new(hint).italics());
        }
    });
}
