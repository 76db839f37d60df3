// Domain-layer modules: zodiac resolution, CSV export, form rules and shared errors/models
pub mod zodiac {
    pub use crate::zodiac::*;
}

pub mod csv_export {
    pub use crate::csv_export::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
