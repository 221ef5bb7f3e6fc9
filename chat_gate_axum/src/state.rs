use std::sync::Arc;

use chat_gate::AuthGate;

/// Shared handler state: the gate built once at process start.
#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<AuthGate>,
}

impl GateState {
    pub fn new(gate: AuthGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}
