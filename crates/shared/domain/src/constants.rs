//! Domain-level constants.
//!
//! Field limits live next to the input structs as `validator` rules.

// =============================================================================
// Catalog
// =============================================================================

/// State assigned to attractions created without one
pub const DEFAULT_ATTRACTION_STATE: &str = "Activo";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 60;

/// Default refresh token lifetime in days
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Longest accepted access token lifetime (one day)
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime (one year)
pub const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 365;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
