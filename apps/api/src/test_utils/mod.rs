//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - In-memory email and push senders that record what was delivered
//! - `TestAppStateBuilder` for HTTP route tests

mod app_state_builder;
mod factories;
mod reminder_mocks;
mod subscription_mocks;
mod user_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use reminder_mocks::*;
pub use subscription_mocks::*;
pub use user_mocks::*;
