//! # API Route Modules
//!
//! - `issuers`: issuer authorization and revocation (administrator only),
//!   issuer lookup.
//! - `credentials`: mint, raw fetch, live verification, expiry check,
//!   revocation, ownership lookup.
//! - `holders`: holder portfolios in mint order.
//! - `events`: ordered lifecycle notification feed.

pub mod credentials;
pub mod events;
pub mod holders;
pub mod issuers;
