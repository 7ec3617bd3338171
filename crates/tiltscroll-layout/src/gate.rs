use tracing::info;

/// Change in sensor registration caused by a lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// Sensor delivery should start.
    Activated,
    /// Sensor delivery should stop.
    Deactivated,
    Unchanged,
}

/// Decides when the sensor should be delivering samples.
///
/// Active only while attached, the window is visible and the container itself
/// is visible. Without a sensor the gate never activates.
#[derive(Debug, Clone)]
pub struct SensorLifecycleGate {
    sensor_available: bool,
    attached: bool,
    window_visible: bool,
    visible: bool,
    registered: bool,
}

impl SensorLifecycleGate {
    pub fn new(sensor_available: bool) -> Self {
        if !sensor_available {
            info!("No rotation sensor available, tilt disabled");
        }
        Self {
            sensor_available,
            attached: false,
            window_visible: true,
            visible: true,
            registered: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.registered
    }

    pub fn set_attached(&mut self, attached: bool) -> GateTransition {
        self.attached = attached;
        if !attached {
            // Detaching always releases the sensor.
            return self.unregister();
        }
        self.update()
    }

    pub fn set_window_visible(&mut self, visible: bool) -> GateTransition {
        self.window_visible = visible;
        self.update()
    }

    pub fn set_visible(&mut self, visible: bool) -> GateTransition {
        self.visible = visible;
        self.update()
    }

    /// Combined visibility of the container, its ancestors and its window.
    pub fn on_visibility_aggregated(&mut self, visible: bool) -> GateTransition {
        self.window_visible = visible;
        self.visible = visible;
        self.update()
    }

    fn should_register(&self) -> bool {
        self.sensor_available && self.attached && self.window_visible && self.visible
    }

    fn update(&mut self) -> GateTransition {
        if self.should_register() {
            self.register()
        } else {
            self.unregister()
        }
    }

    fn register(&mut self) -> GateTransition {
        if self.registered || !self.sensor_available {
            return GateTransition::Unchanged;
        }
        self.registered = true;
        info!("Sensor delivery started");
        GateTransition::Activated
    }

    fn unregister(&mut self) -> GateTransition {
        if !self.registered {
            return GateTransition::Unchanged;
        }
        self.registered = false;
        info!("Sensor delivery stopped");
        GateTransition::Deactivated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activates_only_when_all_conditions_hold() {
        let mut gate = SensorLifecycleGate::new(true);
        assert!(!gate.is_active());

        assert_eq!(gate.set_window_visible(false), GateTransition::Unchanged);
        assert_eq!(gate.set_attached(true), GateTransition::Unchanged);
        assert!(!gate.is_active());

        assert_eq!(gate.set_window_visible(true), GateTransition::Activated);
        assert!(gate.is_active());

        assert_eq!(gate.set_visible(false), GateTransition::Deactivated);
        assert!(!gate.is_active());
        assert_eq!(gate.set_visible(true), GateTransition::Activated);
    }

    #[test]
    fn repeated_signals_are_idempotent() {
        let mut gate = SensorLifecycleGate::new(true);
        assert_eq!(gate.set_attached(true), GateTransition::Activated);
        assert_eq!(gate.set_attached(true), GateTransition::Unchanged);
        assert_eq!(gate.set_visible(true), GateTransition::Unchanged);
        assert_eq!(gate.set_attached(false), GateTransition::Deactivated);
        assert_eq!(gate.set_attached(false), GateTransition::Unchanged);
    }

    #[test]
    fn aggregated_visibility_toggles_delivery() {
        let mut gate = SensorLifecycleGate::new(true);
        gate.set_attached(true);
        assert_eq!(gate.on_visibility_aggregated(false), GateTransition::Deactivated);
        assert_eq!(gate.on_visibility_aggregated(true), GateTransition::Activated);
    }

    #[test]
    fn visibility_without_attach_stays_inactive() {
        let mut gate = SensorLifecycleGate::new(true);
        assert_eq!(gate.on_visibility_aggregated(true), GateTransition::Unchanged);
        assert!(!gate.is_active());
    }

    #[test]
    fn missing_sensor_never_activates() {
        let mut gate = SensorLifecycleGate::new(false);
        assert_eq!(gate.set_attached(true), GateTransition::Unchanged);
        assert_eq!(gate.on_visibility_aggregated(true), GateTransition::Unchanged);
        assert!(!gate.is_active());
    }
}
