//! The current route and everything derived from it.
//!
//! A [`RouteSession`] is built in one go from a route payload and never
//! changes. [`Navigator`] publishes sessions by swapping an `Arc`, so a
//! reader holding the previous session keeps a coherent snapshot while a
//! new route is being loaded. Each session is published together with its
//! own progress tracker, so a fix processed against an old route can only
//! touch that route's tracker.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::geo::GeoPoint;
use crate::nav::ArcLengthIndex;
use crate::progress::{ProgressState, ProgressTracker};
use crate::route::{self, Maneuver, ManeuverNode, Polyline, RouteResponse};
use crate::waypoints::{self, Waypoint, DEFAULT_SPACING_M};

/// Tunables handed over by the host app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Distance between generated waypoints, in meters.
    pub waypoint_spacing_m: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            waypoint_spacing_m: DEFAULT_SPACING_M,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config. An empty string means defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = if json.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_json::from_str(json)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        waypoints::check_spacing(self.waypoint_spacing_m)
    }
}

/// Immutable snapshot of one loaded route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSession {
    pub origin: GeoPoint,
    pub polyline: Polyline,
    pub nodes: Vec<ManeuverNode>,
    pub waypoints: Vec<Waypoint>,
    pub total_length_m: f64,
    #[serde(skip)]
    pub index: ArcLengthIndex,
}

impl RouteSession {
    /// Build a session from maneuvers. `user` is the user's position at
    /// the time the route was requested, if known; it becomes the origin
    /// of the local frame.
    pub fn build(
        maneuvers: &[Maneuver],
        user: Option<GeoPoint>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let (polyline, nodes) = route::build(maneuvers);
        let origin =
            route::choose_origin(user, &polyline, &nodes).unwrap_or(GeoPoint::new(0.0, 0.0));
        let index = ArcLengthIndex::new(&polyline, origin);
        let waypoints = waypoints::generate(&index, config.waypoint_spacing_m)?;

        Ok(Self {
            origin,
            total_length_m: index.total_length(),
            polyline,
            nodes,
            waypoints,
            index,
        })
    }

    /// Waypoint with the smallest along-route distance not behind
    /// `along_m`.
    pub fn next_waypoint(&self, along_m: f64) -> Option<&Waypoint> {
        let i = self.waypoints.partition_point(|w| w.along_m < along_m);
        self.waypoints.get(i)
    }
}

/// A published session and the tracker that follows fixes along it.
#[derive(Debug, Clone)]
struct Active {
    session: Arc<RouteSession>,
    tracker: Arc<Mutex<ProgressTracker>>,
}

impl Active {
    fn new(session: Arc<RouteSession>) -> Self {
        Self {
            session,
            tracker: Arc::new(Mutex::new(ProgressTracker::new())),
        }
    }

    fn update(&self, prev: GeoPoint, curr: GeoPoint) -> ProgressState {
        let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        tracker.update(prev, curr, &self.session.index)
    }
}

/// Owner of the current route session and the per-fix tracker state.
#[derive(Debug, Default)]
pub struct Navigator {
    config: EngineConfig,
    current: RwLock<Option<Active>>,
}

impl Navigator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The currently published session, if any.
    pub fn current(&self) -> Option<Arc<RouteSession>> {
        self.active().map(|active| active.session)
    }

    fn active(&self) -> Option<Active> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build a session from maneuvers and publish it, replacing the
    /// previous one. The new session gets a fresh heading tracker.
    pub fn load(
        &self,
        maneuvers: &[Maneuver],
        user: Option<GeoPoint>,
    ) -> Result<Arc<RouteSession>, EngineError> {
        let session = Arc::new(RouteSession::build(maneuvers, user, &self.config)?);

        let active = Active::new(Arc::clone(&session));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(active);

        info!(
            "route loaded: {:.0} m, {} nodes, {} waypoints",
            session.total_length_m,
            session.nodes.len(),
            session.waypoints.len()
        );

        Ok(session)
    }

    /// Decode a routing service response and load its first route.
    pub fn load_json(
        &self,
        json: &str,
        user: Option<GeoPoint>,
    ) -> Result<Arc<RouteSession>, EngineError> {
        let response = RouteResponse::from_json(json)?;
        self.load(&response.maneuvers(), user)
    }

    /// Process a new fix against the current route.
    pub fn update(&self, prev: GeoPoint, curr: GeoPoint) -> Result<ProgressState, EngineError> {
        let active = self.active().ok_or(EngineError::NoRoute)?;
        Ok(active.update(prev, curr))
    }

    /// Drop the current route.
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
