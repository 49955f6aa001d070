// Error codes implementation
// This module contains standardized error codes for the claims simulator.
// Codes are part of the user-facing contract: CLI output and HTTP error
// bodies both carry them, so never renumber an existing code.

pub mod generation {
    pub const INVALID_CONFIGURATION: &str = "GEN_1001";
    pub const ROW_COUNT_OUT_OF_BOUNDS: &str = "GEN_1002";
    pub const UNKNOWN_VARIANT: &str = "GEN_1003";
}

pub mod filter {
    pub const TYPE_COERCION: &str = "FILTER_2001";
    pub const UNKNOWN_COLUMN: &str = "FILTER_2002";
}

pub mod ingest {
    pub const UNSUPPORTED_FORMAT: &str = "INGEST_3001";
    pub const MALFORMED_INPUT: &str = "INGEST_3002";
}

pub mod catalog {
    pub const EXHAUSTED: &str = "CATALOG_4001";
}

pub mod session {
    pub const NOT_FOUND: &str = "SESSION_5001";
    pub const CAPACITY_REACHED: &str = "SESSION_5002";
}

pub mod system {
    pub const IO: &str = "SYS_9001";
    pub const INTERNAL: &str = "SYS_9999";
}
