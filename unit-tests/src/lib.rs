//! Host tests for the sensor node core, driven by synthetic events.

#![cfg(test)]

mod mocks;

mod broker_session;
mod controller;
mod control_payload;
mod sensor;
mod tls_handshake;
mod trust_anchor;
