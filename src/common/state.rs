use crate::config::Config;
use crate::services::{
    BreakageCorrelator, DeviceResolver, FleetRegistry, NotificationStore, PositionTracker,
    ReportAggregator, TelemetryIngest,
};
use crate::store::Store;

/// Every service over one shared store, built once at startup and cloned
/// into request handlers.
#[derive(Clone)]
pub struct Services<S> {
    pub devices: DeviceResolver<S>,
    pub telemetry: TelemetryIngest<S>,
    pub reports: ReportAggregator<S>,
    pub positions: PositionTracker<S>,
    pub breakages: BreakageCorrelator<S>,
    pub notifications: NotificationStore<S>,
    pub registry: FleetRegistry<S>,
}

impl<S: Store> Services<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            devices: DeviceResolver::new(store.clone()),
            telemetry: TelemetryIngest::new(store.clone()),
            reports: ReportAggregator::new(store.clone()),
            positions: PositionTracker::new(store.clone()),
            breakages: BreakageCorrelator::new(store.clone(), config.breakage_note_label.clone()),
            notifications: NotificationStore::new(store.clone(), config.max_page_size),
            registry: FleetRegistry::new(store, config.default_page_size, config.max_page_size),
        }
    }
}
