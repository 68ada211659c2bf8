//! Validator functions.
//!
//! Every validator returns [`Validation`](crate::error::Validation): `Ok(())` when the
//! check passed, otherwise a [`ValidationError`](crate::error::ValidationError) tagged
//! with the offending fields and their field group. Validators share no state and can
//! run concurrently.

mod certificates;
mod hostname;
mod key_pair;
mod reachability;
mod structural;

#[cfg(feature = "redis")]
mod datastore;

#[cfg(feature = "oauth")]
mod oauth;

pub use certificates::{CERTIFICATES_TAG, validate_all_certs_present, validate_certs_present};
pub use hostname::{normalize_hostname, split_host_port};
pub use key_pair::validate_cert_pair_with_hostname;
pub use reachability::{ReachabilityChecker, Scheme, validate_host_is_reachable};
pub use structural::{
    validate_at_least_one_of_bool, validate_at_least_one_of_string, validate_file_exists,
    validate_is_hostname, validate_is_one_of_string, validate_is_url, validate_required,
    validate_required_string, validate_time_pattern,
};

#[cfg(feature = "redis")]
pub use datastore::{validate_redis_connection, validate_redis_connection_within};

#[cfg(feature = "oauth")]
pub use oauth::OAuthCheck;
