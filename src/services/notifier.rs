use futures_util::future::BoxFuture;

use crate::database::models::{GroupApprovers, VacationRequest};

/// Outbound notification seam for freshly filed vacation requests. Delivery
/// runs off the request path, so implementations report failures through the
/// returned result and must never panic.
pub trait ApproverNotifier: Send + Sync {
    fn request_filed<'a>(
        &'a self,
        request: &'a VacationRequest,
        approvers: &'a GroupApprovers,
    ) -> BoxFuture<'a, anyhow::Result<()>>;
}

/// Placeholder delivery that only logs. Swapped for a real mailer once the
/// mail pipeline lands.
pub struct LogNotifier;

impl ApproverNotifier for LogNotifier {
    fn request_filed<'a>(
        &'a self,
        request: &'a VacationRequest,
        approvers: &'a GroupApprovers,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            let recipients: Vec<&str> = [
                &approvers.main_approval_user,
                &approvers.temp_approval_user,
            ]
            .into_iter()
            .flatten()
            .map(|contact| contact.email.as_str())
            .collect();

            log::info!(
                "notification email not sent (delivery not finished): vacation {} on {} for {:?}",
                request.id,
                request.requested_day,
                recipients
            );

            Ok(())
        })
    }
}
