use std::sync::Arc;

use tracing::info;

use super::controller::TransitionController;
use super::dnd::BoardDnd;
use super::notify::ToastQueue;
use super::store::{ApplicationStore, LoadState};
use super::view::Board;
use crate::client::{ApplicationsApi, HttpApplicationsApi};
use crate::config::Config;
use crate::error::{ActionResult, Result};
use crate::models::application::ApplicationStats;

/// One board view over one position (or all of them): store, toasts,
/// controller and drag layer wired together.
pub struct BoardSession {
    api: Arc<dyn ApplicationsApi>,
    toasts: Arc<ToastQueue>,
    dnd: BoardDnd,
}

impl BoardSession {
    pub fn new(api: Arc<dyn ApplicationsApi>, config: &Config, position_id: Option<&str>) -> Self {
        let toasts = Arc::new(ToastQueue::new());
        let mut controller =
            TransitionController::new(api.clone(), ApplicationStore::new(), toasts.clone())
                .with_policy(config.revert_policy);
        if let Some(position_id) = position_id {
            controller = controller.for_position(position_id);
        }
        let dnd = BoardDnd::new(controller, config.drag_activation_distance);
        Self { api, toasts, dnd }
    }

    /// Session talking HTTP to `config.api_base_url`.
    pub fn connect(config: &Config, position_id: Option<&str>) -> Result<Self> {
        let api = HttpApplicationsApi::from_config(config)?;
        info!(base_url = %api.base_url(), position_id = ?position_id, "board session created");
        Ok(Self::new(Arc::new(api), config, position_id))
    }

    pub async fn load(&self) -> ActionResult {
        self.controller().refresh().await
    }

    pub fn board(&self) -> Board {
        Board::from_store(self.store())
    }

    pub fn load_state(&self) -> LoadState {
        self.store().load_state()
    }

    pub async fn stats(&self) -> Result<ApplicationStats> {
        self.api.stats().await
    }

    pub fn controller(&self) -> &TransitionController {
        self.dnd.controller()
    }

    pub fn store(&self) -> &ApplicationStore {
        self.controller().store()
    }

    pub fn dnd(&mut self) -> &mut BoardDnd {
        &mut self.dnd
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }
}
