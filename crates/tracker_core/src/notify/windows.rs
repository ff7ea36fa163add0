use crate::error::AppError;
use crate::notify::{Notifier, reset_message};
use crate::reset::ResetOutcome;
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify_reset(&self, outcome: &ResetOutcome) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title("tracker")
            .text1(&reset_message(outcome))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
