use async_trait::async_trait;
use tracing::info;

use crate::{app_error::AppResult, use_cases::user::EmailSender};

/// Development sender used when no Resend key is configured: the message is
/// written to the log instead of being delivered.
#[derive(Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        info!(to = %to, subject = %subject, html_len = html.len(), "Email not sent (no provider configured)");
        Ok(())
    }
}
