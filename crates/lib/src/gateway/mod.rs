//! Gateway: HTTP webhook endpoint for the Messenger platform.
//!
//! `GET /webhook` answers the subscription handshake; `POST /webhook` receives
//! page events, picks a scripted reply, and relays it through the Send API.

mod protocol;
mod server;
mod webhook;

pub use protocol::{StatusBody, VerifyParams, SUBSCRIBE_MODE};
pub use server::{build_router, run_gateway, GatewayState};
pub use webhook::{dispatch_payload, verify_subscription, VerifyError};
