use hn_inference::curator::Curator;
use std::sync::Arc;

pub struct AppState {
    pub curator: Arc<Curator>,
}
