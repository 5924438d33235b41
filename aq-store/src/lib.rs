//! Reactive resource cache for the air-quality dashboard.
//!
//! - `slot`: async state for one lane, guarded by fetch generations
//! - `selection`: the user's station and period choices
//! - `availability`: backend reachability flag and the probe that sets it
//! - `coordinator`: keeps slots keyed to the selection and runs fetches
//! - `derive`: the loading / data / error flags views render from
//! - `dashboard`: the facade tying it together
//! - `http` (feature `api`): reqwest backend

pub mod availability;
pub mod backend;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod key;
pub mod observable;
pub mod selection;
pub mod slot;

#[cfg(feature = "api")]
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::Availability;
pub use backend::{Backend, Payload};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, ViewWatch};
pub use derive::{ViewDisplay, ViewKind, ViewState};
pub use error::FetchError;
pub use key::{Mode, SlotKey};
