//! Tilt-driven parallax scrolling.
//!
//! [`GravityLayout`] turns rotation-vector samples into a smoothly animated
//! content offset. The pieces are usable on their own: [`mapper`] for the
//! tilt-to-offset mapping, [`smoother`] for the eased scroll and [`gate`] for
//! deciding when the sensor should be running.

pub mod gate;
pub mod layout;
pub mod mapper;
pub mod smoother;

pub use gate::{GateTransition, SensorLifecycleGate};
pub use layout::{GravityLayout, TiltEvent};
pub use mapper::{map_tilt, MapperConfig, TiltMapper, TiltMapping};
pub use smoother::MotionSmoother;
