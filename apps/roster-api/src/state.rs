use std::sync::Arc;

use roster_service::RosterService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RosterService>,
}
impl AppState {
	/// Connects the configured record store and the HTTP providers.
	pub async fn new(config: roster_config::Config) -> color_eyre::Result<Self> {
		let store = roster_storage::open(&config.storage).await?;
		let service = RosterService::new(config, store)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: RosterService) -> Self {
		Self { service: Arc::new(service) }
	}
}
