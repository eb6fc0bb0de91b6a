//! Model-View-Intent primitives shared by store implementations.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ StatePublisher ──→ View
//!    ↑           │                                     │
//!    │           └──→ Effect (run by the store)         │
//!    └─────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot republished to the UI
//! - **Action**: user intents or completions of store work
//! - **Reducer**: pure function producing the next state plus effects

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::StoreState;
