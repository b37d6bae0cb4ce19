//! Domain layer: entities, authorization rules, proximity search and
//! repository interfaces. Nothing here performs I/O.

pub mod access;
pub mod caller;
pub mod charger;
pub mod proximity;
pub mod repositories;
pub mod user;

pub use access::{AccessPolicy, RecordAction};
pub use caller::{Caller, Role};
pub use charger::{
    ChargerChanges, ChargerFilter, ChargerRecord, ChargerRepository, ChargerStatus, NewCharger,
};
pub use proximity::{GeoPoint, ProximityFilter, ProximityMatches, DEFAULT_RADIUS_KM};
pub use repositories::RepositoryProvider;
pub use user::{NewUser, User, UserRepository};

pub use crate::shared::errors::{DomainError, DomainResult};
