use std::time::Duration;

use eframe::egui;

use crate::session::ChatSession;

use super::components::{chat_area, input_bar, status_bar};
use super::state::ViewState;

/// Inbound messages arrive without user input, so keep polling the session.
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct ChatApp {
    session: ChatSession,
    view: ViewState,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: ChatSession) -> Self {
        Self {
            session,
            view: ViewState::new(),
        }
    }

    fn send_message(&mut self, text: String) {
        let outcome = self.session.send(&text);
        log::debug!("Send outcome: {outcome:?}");
        self.view.last_outcome = Some(outcome);
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.pump();
        let scroll = self.view.observe_revision(self.session.store().revision());

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            status_bar::render(
                ui,
                self.session.connection_state(),
                self.session.identity(),
                self.view.outcome_hint(),
            );
        });

        let mut outgoing = None;
        egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
            outgoing = input_bar::render(ui, &mut self.view.input_text);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Chat");
            ui.separator();
            chat_area::render(ui, self.session.messages(), scroll);
        });

        if let Some(content) = outgoing {
            self.send_message(content);
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
