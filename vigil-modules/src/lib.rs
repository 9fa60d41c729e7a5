//! Vigil Modules
//!
//! Feature modules of the analyst console. Each module owns its local,
//! ephemeral UI state and reads or mutates the shared session only through
//! the [`SessionStore`](vigil_core::SessionStore):
//! - **Dashboard**: metric cards, alert panel, activity chart, recent targets
//! - **Search**: query form, simulated source integration, profile promotion
//! - **Profiles**: projection of the target list with edit and delete
//! - **Analysis**: trend, risk, network and weak-signal views
//! - **Surveillance**: realtime events, active targets, zones
//! - **Reports**: report catalogue with filtering and export
//! - **Settings**: in-memory configuration editor

pub mod analysis;
pub mod dashboard;
pub mod profiles;
pub mod reports;
pub mod search;
pub mod settings;
pub mod source;
pub mod surveillance;
pub mod traits;

pub use analysis::*;
pub use dashboard::*;
pub use profiles::*;
pub use reports::*;
pub use search::*;
pub use settings::*;
pub use source::*;
pub use surveillance::*;
pub use traits::*;
