use std::cmp::Ordering;
use std::sync::Arc;

use super::store::ApplicationStore;
use crate::models::application::{Application, ApplicationStats, ApplicationStatus};

/// Highest rating first, then most recent application. Unrated cards and
/// cards without an application date sink.
pub fn card_order(a: &Application, b: &Application) -> Ordering {
    b.effective_rating()
        .cmp(&a.effective_rating())
        .then_with(|| b.applied_at.cmp(&a.applied_at))
}

#[derive(Debug, Clone)]
pub struct Column {
    pub status: ApplicationStatus,
    pub cards: Vec<Arc<Application>>,
}

impl Column {
    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Applications grouped into the six pipeline columns.
#[derive(Debug, Clone)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    pub fn from_applications(applications: &[Arc<Application>]) -> Self {
        let mut columns: Vec<Column> = ApplicationStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                cards: Vec::new(),
            })
            .collect();

        for application in applications {
            // Records outside the pipeline have no column.
            if let Some(stage) = application.status.stage() {
                columns[stage.position()].cards.push(Arc::clone(application));
            }
        }
        for column in &mut columns {
            column.cards.sort_by(|a, b| card_order(a, b));
        }

        Self { columns }
    }

    pub fn from_store(store: &ApplicationStore) -> Self {
        Self::from_applications(&store.snapshot())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: ApplicationStatus) -> &Column {
        &self.columns[status.position()]
    }

    /// Column header counts; `total` covers rendered cards only.
    pub fn counts(&self) -> ApplicationStats {
        ApplicationStats::tally(
            self.columns
                .iter()
                .flat_map(|c| c.cards.iter().map(|card| &**card)),
        )
    }
}
