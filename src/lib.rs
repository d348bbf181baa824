// Script-level force and analyzer control
pub mod core {
    pub mod context;
    pub mod ids;
    pub mod particles;
    pub mod types;
}

pub mod coeff;

pub mod forces {
    pub mod constant;
    pub mod external;
    pub mod handle;
    pub mod parametrized;
}

pub mod analyze {
    pub mod dump;
}

pub mod platform {
    pub mod analyzer;
    pub mod compute;
    pub mod exec;
    pub mod record;
    pub mod scheduler;
}

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod script;

pub use error::{Error, Result};
