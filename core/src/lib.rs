pub mod paste;
pub mod store;
pub mod types;

pub use paste::{PasteCache, PasteService, TcpPasteService};
pub use store::CampaignStore;
pub use store::error::StoreError;
