//! User-visible error reporting

use jigsaw_core::{Notice, Notifier};

/// Logs to the console and shows a blocking alert, like the rest of the page
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&mut self, notice: &Notice) {
        gloo::console::error!(notice.message.clone(), notice.cause.clone());
        gloo::dialogs::alert(&notice.to_string());
    }
}
