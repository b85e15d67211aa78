pub mod fallback;
pub mod pricing;

mod quote_api;
mod route_api;

use tokio::sync::Mutex;

use crate::{
    api::API,
    config::Config,
    entities::PricingTable,
    external::{google_maps::GoogleMaps, DynProvider},
};

use fallback::DynSampler;

pub struct Engine {
    provider: Option<DynProvider>,
    sampler: Mutex<DynSampler>,
    pricing: PricingTable,
}

impl Engine {
    /// Without a provider every route is answered with a fallback estimate.
    pub fn new(provider: Option<DynProvider>, sampler: DynSampler) -> Self {
        Self {
            provider,
            sampler: Mutex::new(sampler),
            pricing: PricingTable::default(),
        }
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub fn from_config(config: &Config) -> Self {
        let provider = config.google_maps_api_key.clone().map(|key| {
            Box::new(GoogleMaps::new(config.google_maps_api_base.clone(), key)) as DynProvider
        });

        if provider.is_none() {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, routes will be estimated");
        }

        Self::new(provider, fallback::entropy_sampler())
    }
}

impl API for Engine {}
