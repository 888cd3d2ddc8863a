pub mod android_jni;
pub mod error;
pub mod geo;
pub mod gpx;
pub mod nav;
pub mod progress;
pub mod route;
pub mod session;
pub mod waypoints;
pub mod wkt;

pub use error::EngineError;
pub use geo::{to_geo, to_local, GeoPoint, LocalPoint};
pub use nav::ArcLengthIndex;
pub use progress::{HeadingHint, ProgressState, ProgressTracker};
pub use route::{Maneuver, ManeuverNode, Polyline};
pub use session::{EngineConfig, Navigator, RouteSession};
pub use waypoints::Waypoint;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
