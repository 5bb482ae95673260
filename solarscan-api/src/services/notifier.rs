//! Result notification

use async_trait::async_trait;

use super::NotifyError;
use crate::models::AnalysisResult;

/// Delivers a completed result to the requester
///
/// Best effort: the orchestrator logs failures and never fails the analysis.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, email: &str, result: &AnalysisResult) -> Result<(), NotifyError>;
}

/// Logs the delivery instead of sending mail (no SMTP relay configured)
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, email: &str, result: &AnalysisResult) -> Result<(), NotifyError> {
        tracing::info!(
            request_id = %result.request_id,
            email = %email,
            annual_generation_kwh = result.solar_prediction.annual_generation_kwh,
            "Sending result email"
        );
        Ok(())
    }
}
