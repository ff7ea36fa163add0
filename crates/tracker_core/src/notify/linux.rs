use crate::error::AppError;
use crate::notify::{Notifier, reset_message};
use crate::reset::ResetOutcome;
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify_reset(&self, outcome: &ResetOutcome) -> Result<(), AppError> {
        Notification::new()
            .summary("tracker")
            .body(&reset_message(outcome))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
