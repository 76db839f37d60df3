//! Lead stores and admin authentication backends.

pub mod backend {
    pub use crate::backend::*;
}

pub mod supabase_client {
    pub use crate::supabase_client::*;
}

pub mod db_storage {
    pub use crate::db_storage::*;
}

pub mod local_auth {
    pub use crate::local_auth::*;
}
