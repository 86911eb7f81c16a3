use std::sync::Arc;

use crate::engine::StatsEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<StatsEngine>,
}
