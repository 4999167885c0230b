//! Terminal core: card bridge, navigation, paging, verification flow and
//! the context every screen runs against.

pub mod card;
pub mod context;
pub mod devices;
pub mod error;
pub mod feedback;
pub mod navigation;
pub mod pagination;
pub mod replay;
pub mod verification;

pub use card::{CardBridge, ReaderEndpoint, ReaderState, TagOutcome};
pub use context::AppContext;
pub use devices::{Devices, NfcStatus, NfcTag};
pub use error::{AppError, AppResult, CardError, VendorFailure};
pub use feedback::Alert;
pub use navigation::{Channel, Navigator, Route, VerificationListParams, VerificationQuery};
pub use pagination::{PageCursor, PagedList};
pub use replay::{DeviceFixture, ReplayDevices};
pub use verification::{VerificationOutcome, VerificationPlan, VerificationSelection};
