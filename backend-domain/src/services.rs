// Pure domain services: parsing remote console text and comparing DNS state

pub mod ip_drift;
pub mod player_list;
pub mod playtime;

pub use ip_drift::*;
pub use player_list::*;
pub use playtime::*;
