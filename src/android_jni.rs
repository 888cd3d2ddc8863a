//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to a `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.
//!
//! Structured results cross the boundary as JSON strings. Failures are
//! thrown as Java exceptions and the function returns null.

use std::sync::OnceLock;

use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jdouble, jstring, JNI_TRUE};
use jni::JNIEnv;
use log::{error, LevelFilter};
use serde::Serialize;

use crate::error::EngineError;
use crate::geo::GeoPoint;
use crate::session::{EngineConfig, Navigator};

const LOG_TAG: &str = "ar-route-core";

static NAVIGATOR: OnceLock<Navigator> = OnceLock::new();

fn navigator() -> &'static Navigator {
    NAVIGATOR.get_or_init(Navigator::default)
}

/// Turn a result into a Java string, or throw and return null.
fn respond(env: &mut JNIEnv, result: Result<String, EngineError>) -> jstring {
    let outcome = result.map_err(|e| {
        let class = match e {
            EngineError::NoRoute => "java/lang/IllegalStateException",
            _ => "java/lang/IllegalArgumentException",
        };
        (class, e.to_string())
    });

    match outcome {
        Ok(text) => match env.new_string(text) {
            Ok(s) => s.into_raw(),
            Err(e) => {
                error!("failed to create Java string: {e}");
                std::ptr::null_mut()
            }
        },
        Err((class, message)) => {
            error!("{message}");
            if let Err(e) = env.throw_new(class, message) {
                error!("failed to throw {class}: {e}");
            }
            std::ptr::null_mut()
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, EngineError> {
    Ok(serde_json::to_string(value)?)
}

/// Read an optional Java string; null maps to an empty string.
fn read_string(env: &mut JNIEnv, s: &JString) -> Result<String, jni::errors::Error> {
    if s.is_null() {
        return Ok(String::new());
    }
    Ok(env.get_string(s)?.into())
}

/// Returns the ar-route-core version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_arnav_app_RustBridge_version(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    respond(&mut env, Ok(crate::VERSION.to_string()))
}

/// Installs the logger and the global navigator.
/// Maps to: RustBridge.init(configJson: String?) -> String
///
/// Returns the effective config as JSON. Only the first successful call
/// configures the navigator; later calls report the config in use.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_arnav_app_RustBridge_init(
    mut env: JNIEnv,
    _class: JClass,
    config_json: JString,
) -> jstring {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag(LOG_TAG),
    );

    let result = match read_string(&mut env, &config_json) {
        Ok(json) => EngineConfig::from_json(&json).and_then(|config| {
            let installed = NAVIGATOR.get_or_init(|| Navigator::new(config));
            to_json(installed.config())
        }),
        Err(e) => {
            error!("failed to read config string: {e}");
            return std::ptr::null_mut();
        }
    };

    respond(&mut env, result)
}

/// Loads a routing service response as the current route.
/// Maps to: RustBridge.loadRoute(json: String, userLon: Double,
///     userLat: Double, hasUser: Boolean) -> String
///
/// Returns the new route session as JSON.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_arnav_app_RustBridge_loadRoute(
    mut env: JNIEnv,
    _class: JClass,
    response_json: JString,
    user_lon: jdouble,
    user_lat: jdouble,
    has_user: jboolean,
) -> jstring {
    let json = match read_string(&mut env, &response_json) {
        Ok(json) => json,
        Err(e) => {
            error!("failed to read route string: {e}");
            return std::ptr::null_mut();
        }
    };

    let user = (has_user == JNI_TRUE).then(|| GeoPoint::new(user_lon, user_lat));
    let result = navigator()
        .load_json(&json, user)
        .and_then(|session| to_json(&*session));

    respond(&mut env, result)
}

/// Processes a GPS fix against the current route.
/// Maps to: RustBridge.updatePosition(prevLon: Double, prevLat: Double,
///     currLon: Double, currLat: Double) -> String
///
/// Returns the progress state as JSON.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_arnav_app_RustBridge_updatePosition(
    mut env: JNIEnv,
    _class: JClass,
    prev_lon: jdouble,
    prev_lat: jdouble,
    curr_lon: jdouble,
    curr_lat: jdouble,
) -> jstring {
    let result = navigator()
        .update(GeoPoint::new(prev_lon, prev_lat), GeoPoint::new(curr_lon, curr_lat))
        .and_then(|state| to_json(&state));

    respond(&mut env, result)
}

/// Exports the current route as a GPX document.
/// Maps to: RustBridge.exportGpx() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_arnav_app_RustBridge_exportGpx(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = navigator()
        .current()
        .ok_or(EngineError::NoRoute)
        .and_then(|session| crate::gpx::export(&session));

    respond(&mut env, result)
}
