//! Entry point: wires transport, executor and fallback router, hands out services.

use anyhow::Result;
use std::sync::Arc;
use url::Url;

use crate::config::ClientConfig;
use crate::executor::RequestExecutor;
use crate::fallback::FallbackRouter;
use crate::retry::RetryPolicy;
use crate::services::{
    AlternativeMethodsService, InstallmentsService, PaymentsService, PayoutsService,
    ReportsService, SubscriptionsService,
};
use crate::transport::{CurlTransport, Transport};

/// Client for the payment API. Cheap to share; every service borrows it.
pub struct ApiClient {
    executor: Arc<RequestExecutor>,
    router: FallbackRouter,
}

impl ApiClient {
    /// Build a client with the curl transport from config.
    pub fn from_config(cfg: &ClientConfig) -> Result<Self> {
        let base_url = cfg.validate()?;
        let transport = CurlTransport::from_config(cfg);
        tracing::debug!(base_url = %base_url, ?transport, "api client configured");
        Ok(Self::with_transport(
            Arc::new(transport),
            base_url,
            cfg.retry_policy(),
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        base_url: Url,
        policy: RetryPolicy,
    ) -> Self {
        let executor = Arc::new(RequestExecutor::new(transport, base_url, policy));
        let router = FallbackRouter::new(Arc::clone(&executor));
        Self { executor, router }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn router(&self) -> &FallbackRouter {
        &self.router
    }

    pub fn payments(&self) -> PaymentsService<'_> {
        PaymentsService::new(self)
    }

    pub fn payouts(&self) -> PayoutsService<'_> {
        PayoutsService::new(self)
    }

    pub fn subscriptions(&self) -> SubscriptionsService<'_> {
        SubscriptionsService::new(self)
    }

    pub fn installments(&self) -> InstallmentsService<'_> {
        InstallmentsService::new(self)
    }

    pub fn alternative_methods(&self) -> AlternativeMethodsService<'_> {
        AlternativeMethodsService::new(self)
    }

    pub fn reports(&self) -> ReportsService<'_> {
        ReportsService::new(self)
    }
}
