use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use myrtio_sensor_core::domain::trust::anchor_key;

const DEFAULT_CA_PATH: &str = "certs/broker_ca.der";

fn main() {
    // Export WIFI_* and MQTT_* from .env as compile-time variables
    dotenv_build::output(dotenv_build::Config::default()).unwrap();

    let now = chrono::Utc::now();
    println!(
        "cargo:rustc-env=BUILD_VERSION={}",
        now.format("%Y.%m.%d-%H%M")
    );
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", now.timestamp());

    embed_broker_ca();
}

/// Copy the broker CA certificate next to the generated sources so the
/// firmware can `include_bytes!` it from `OUT_DIR`.
///
/// The TLS verifier only accepts a certificate signed directly by the anchor
/// with ECDSA or Ed25519, so anchors with other keys are rejected here.
fn embed_broker_ca() {
    println!("cargo:rerun-if-env-changed=MQTT_CA_CERT");
    let source = env::var("MQTT_CA_CERT").unwrap_or_else(|_| DEFAULT_CA_PATH.to_owned());
    let source = Path::new(&source);
    println!("cargo:rerun-if-changed={}", source.display());

    let certificate = fs::read(source).unwrap_or_else(|e| {
        panic!(
            "broker CA certificate {} could not be read: {}",
            source.display(),
            e
        )
    });
    if let Err(e) = anchor_key(&certificate) {
        panic!("broker CA certificate {}: {}", source.display(), e);
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("broker_ca.der"), certificate).unwrap();
}
