//! Best-effort, system-level alerts (the OS "local notification").
//!
//! Delivery is owned by the platform. The command layer fires an alert and
//! forgets about it; the outcome never affects store state.

use async_trait::async_trait;

/// Content of a system-level alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemAlert {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

impl SystemAlert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            sound: true,
        }
    }

    /// Confirmation raised after a product was added.
    pub fn product_added() -> Self {
        Self::new("Product Added!", "Your product was successfully added.")
    }
}

/// Platform alert delivery.
#[async_trait]
pub trait SystemAlerter: Send + Sync {
    async fn alert(&self, alert: &SystemAlert) -> anyhow::Result<()>;
}

/// Alerter that only records the alert in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlerter;

#[async_trait]
impl SystemAlerter for LogAlerter {
    async fn alert(&self, alert: &SystemAlert) -> anyhow::Result<()> {
        tracing::info!(
            title = %alert.title,
            body = %alert.body,
            sound = alert.sound,
            "system alert"
        );
        Ok(())
    }
}
