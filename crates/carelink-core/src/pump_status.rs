//! Pump-status entry construction.
//!
//! Copies the whitelisted scalar fields of a snapshot into a
//! [`PumpStatusEntry`]. Fields the pump did not report stay absent; nothing
//! is defaulted. For the values these fields take, see the CareLink notes at
//! <https://gist.github.com/mddub/5e4a585508c93249eb51>.

use carelink_types::{CareLinkSnapshot, PumpStatusEntry, Timestamp};

/// Build the status entry for a snapshot.
///
/// `iob` is taken from `activeInsulin.amount` only when the amount is zero
/// or more; CareLink reports a negative amount when insulin on board is
/// unknown. The entry is stamped with the time of the last pump contact and
/// carries no device yet.
#[must_use]
pub fn pump_status_entry(snapshot: &CareLinkSnapshot) -> PumpStatusEntry {
    PumpStatusEntry {
        conduit_in_range: snapshot.conduit_in_range,
        conduit_medical_device_in_range: snapshot.conduit_medical_device_in_range,
        conduit_sensor_in_range: snapshot.conduit_sensor_in_range,
        medical_device_suspended: snapshot.medical_device_suspended,
        conduit_battery_level: snapshot.conduit_battery_level.clone(),
        reservoir_level_percent: snapshot.reservoir_level_percent.clone(),
        reservoir_amount: snapshot.reservoir_amount.clone(),
        medical_device_battery_level_percent: snapshot
            .medical_device_battery_level_percent
            .clone(),
        sensor_duration_hours: snapshot.sensor_duration_hours.clone(),
        time_to_next_calib_hours: snapshot.time_to_next_calib_hours.clone(),
        sensor_state: snapshot.sensor_state.clone(),
        calib_status: snapshot.calib_status.clone(),
        iob: snapshot
            .active_insulin
            .as_ref()
            .and_then(|insulin| insulin.amount.clone())
            .filter(|amount| amount.as_f64().is_some_and(|amount| amount >= 0.0)),
        timestamp: Timestamp::from_millis(snapshot.last_medical_device_data_update_server_time),
        device: String::new(),
    }
}
