pub mod controller;
pub mod dnd;
pub mod notify;
pub mod session;
pub mod store;
pub mod view;

pub use controller::{PendingTransition, ReviewUpdate, RevertPolicy, Transition, TransitionController};
pub use dnd::{BoardDnd, DndOutcome, DragEvent, Point, PointerTracker};
pub use notify::{Confirm, Notifier, Toast, ToastKind, ToastQueue};
pub use session::BoardSession;
pub use store::{ApplicationStore, LoadState};
pub use view::{Board, Column};
