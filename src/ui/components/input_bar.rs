use eframe::egui;

/// Composer: returns the submitted text once per Send click or Enter press.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> Option<String> {
    let mut submitted = false;
    ui.horizontal(|ui| {
        let send_width = 60.0;
        let editor = egui::TextEdit::singleline(input_text)
            .hint_text("Type a message")
            .desired_width((ui.available_width() - send_width).max(0.0));
        let response = ui.add(editor);

        if ui.button("Send").clicked() {
            submitted = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
            response.request_focus();
        }
    });

    if submitted {
        return take_submission(input_text);
    }
    None
}

/// Blank input stays in the box and is not sent; anything else is handed
/// over as typed and the box is cleared.
pub fn take_submission(input_text: &mut String) -> Option<String> {
    if input_text.trim().is_empty() {
        return None;
    }
    Some(std::mem::take(input_text))
}
