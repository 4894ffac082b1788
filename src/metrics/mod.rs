//! Signal scorer modules for seafood scoring
//!
//! Each independent signal is implemented in its own module. All of them are
//! pure lookups that degrade to a neutral contribution on a miss.

pub mod iucn_status;
pub mod fishing_method;
pub mod catch_area;
pub mod origin;

// Re-export scorer types and functions
pub use iucn_status::{iucn_base, IucnInput, IucnStatus, UNKNOWN_STATUS_BASE};
pub use fishing_method::{
    gear_code_to_method, is_damaging_trawl, FishingMethod, MethodTable, UNKNOWN_METHOD,
};
pub use catch_area::{AreaTable, FaoArea};
pub use origin::{certification_modifier, origin_modifier};
