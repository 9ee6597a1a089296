//! services/api/src/adapters/otp.rs
//!
//! A stand-in for an SMS passcode provider. It implements the `OtpService`
//! port by waiting a fixed delay and accepting any six-digit code.

use async_trait::async_trait;
use college_path_core::ports::{OtpService, PortResult};
use college_path_core::validation::is_well_formed_otp;
use std::time::Duration;
use tracing::info;

#[derive(Clone, Debug)]
pub struct SimulatedOtpAdapter {
    send_delay: Duration,
    verify_delay: Duration,
}

impl SimulatedOtpAdapter {
    pub fn new(send_delay: Duration, verify_delay: Duration) -> Self {
        Self {
            send_delay,
            verify_delay,
        }
    }
}

#[async_trait]
impl OtpService for SimulatedOtpAdapter {
    async fn send_code(&self, _phone: &str) -> PortResult<()> {
        tokio::time::sleep(self.send_delay).await;
        info!("Simulated OTP sent");
        Ok(())
    }

    async fn verify_code(&self, _phone: &str, code: &str) -> PortResult<bool> {
        tokio::time::sleep(self.verify_delay).await;
        Ok(is_well_formed_otp(code))
    }
}
