use eframe::egui;

use crate::common::ChatMessage;

pub fn render<'a>(
    ui: &mut egui::Ui,
    messages: impl Iterator<Item = &'a ChatMessage>,
    scroll_to_bottom: bool,
) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                render_message(ui, message);
            }
            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage) {
    // Tin nhắn của mình canh phải, của người khác canh trái.
    let layout = if message.is_local() {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        ui.label(message.text.as_str());
        ui.label(
            egui::RichText::new(format!(
                "{} · {}",
                message.sender,
                message.timestamp.format("%H:%M:%S")
            ))
            .weak(),
        );
    });
}
