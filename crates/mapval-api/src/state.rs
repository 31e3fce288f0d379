//! Shared state handed to route handlers through the `State` extractor.

use std::sync::Arc;

use mapval_engine::Validator;

/// A validator shared by every request. Validation keeps no state between
/// calls, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct ApiState {
    pub validator: Arc<Validator>,
}

impl ApiState {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }
}
