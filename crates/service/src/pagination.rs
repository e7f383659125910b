//! Pagination menu for the listing endpoint.
//!
//! Page sizes and offsets are drawn from small closed sets rather than
//! arbitrary integers. The menu is data, so an alternate one can be
//! loaded from configuration without touching the validator or builder.

use crate::errors::ServiceError;

/// Allowed `take`/`skip` values plus the defaults used when a listing
/// request is entirely absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationMenu {
    take_options: Vec<u64>,
    skip_options: Vec<u64>,
    default_take: u64,
    default_skip: u64,
}

impl PaginationMenu {
    /// Build a menu; defaults must be members of their option sets.
    pub fn new(
        take_options: Vec<u64>,
        skip_options: Vec<u64>,
        default_take: u64,
        default_skip: u64,
    ) -> Result<Self, ServiceError> {
        if take_options.is_empty() || take_options.contains(&0) {
            return Err(ServiceError::validation("take", "take options must be non-empty and positive"));
        }
        if skip_options.is_empty() {
            return Err(ServiceError::validation("skip", "skip options must be non-empty"));
        }
        if !take_options.contains(&default_take) {
            return Err(ServiceError::validation("take", format!("default take {default_take} is not an allowed value")));
        }
        if !skip_options.contains(&default_skip) {
            return Err(ServiceError::validation("skip", format!("default skip {default_skip} is not an allowed value")));
        }
        Ok(Self { take_options, skip_options, default_take, default_skip })
    }

    pub fn take_options(&self) -> &[u64] { &self.take_options }

    pub fn skip_options(&self) -> &[u64] { &self.skip_options }

    pub fn default_take(&self) -> u64 { self.default_take }

    pub fn default_skip(&self) -> u64 { self.default_skip }

    pub fn allows_take(&self, take: u64) -> bool { self.take_options.contains(&take) }

    pub fn allows_skip(&self, skip: u64) -> bool { self.skip_options.contains(&skip) }
}

impl Default for PaginationMenu {
    fn default() -> Self {
        Self {
            take_options: vec![10, 20, 50],
            skip_options: vec![0, 10, 20, 50],
            default_take: 10,
            default_skip: 0,
        }
    }
}

impl TryFrom<&configs::ListingConfig> for PaginationMenu {
    type Error = ServiceError;

    fn try_from(cfg: &configs::ListingConfig) -> Result<Self, Self::Error> {
        Self::new(cfg.take_options.clone(), cfg.skip_options.clone(), cfg.default_take, cfg.default_skip)
    }
}

/// Render an option set the way validation messages list it: `10, 20, 50`.
pub(crate) fn render_options(options: &[u64]) -> String {
    options.iter().map(u64::to_string).collect::<Vec<_>>().join(", ")
}
