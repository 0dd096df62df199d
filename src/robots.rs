//! Advisory crawl-policy check.
//!
//! The site's robots.txt is fetched once before anything else. Status
//! handling follows the conventional robots reader: 401 and 403 mean the
//! whole site is off limits and other 4xx statuses mean there is no policy.
//! A 5xx or a transport failure leaves the question open; the run proceeds
//! with a warning.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use texting_robots::Robot;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PolicyVerdict {
    /// Fetching the base URL is permitted. `crawl_delay` is the advertised delay in seconds.
    Allowed { crawl_delay: Option<f32> },
    Disallowed,
    /// The policy could not be fetched or parsed.
    Unavailable(String),
}

impl PolicyVerdict {
    /// Whether the run may go ahead.
    pub fn permits(&self) -> bool {
        !matches!(self, PolicyVerdict::Disallowed)
    }
}

/// Evaluate `robots_txt` for `agent` against `target`.
pub fn evaluate(robots_txt: &str, agent: &str, target: &str) -> Result<PolicyVerdict> {
    let robot =
        Robot::new(agent, robots_txt.as_bytes()).map_err(|e| Error::PolicyParse(e.to_string()))?;
    if robot.allowed(target) {
        Ok(PolicyVerdict::Allowed {
            crawl_delay: robot.delay,
        })
    } else {
        Ok(PolicyVerdict::Disallowed)
    }
}

/// Fetch the crawl policy and decide whether the run may touch `base_url`.
///
/// Never fails: every outcome is folded into a [`PolicyVerdict`] and logged,
/// `info!` when allowed and `warn!` otherwise.
///
/// # Arguments
///
/// * `fetcher` - Used for the single robots.txt request
/// * `config` - Supplies `robots_url`, `robots_agent` and the `base_url` to check
///
/// # Returns
///
/// * `Allowed` - served and permitting, or answered with a 4xx other than 401/403
/// * `Disallowed` - served and forbidding, or answered with 401/403
/// * `Unavailable` - a 5xx, a transport failure, or a body that would not parse
#[instrument(level = "info", skip_all, fields(robots_url = %config.robots_url))]
pub async fn check_policy(fetcher: &dyn PageFetcher, config: &Config) -> PolicyVerdict {
    let verdict = match fetcher.fetch_text(&config.robots_url).await {
        Ok(text) => evaluate(&text, &config.robots_agent, &config.base_url)
            .unwrap_or_else(|e| PolicyVerdict::Unavailable(e.to_string())),
        Err(Error::Status {
            status: 401 | 403, ..
        }) => PolicyVerdict::Disallowed,
        Err(e @ Error::Status { status: 500.., .. }) => PolicyVerdict::Unavailable(e.to_string()),
        Err(Error::Status { status, .. }) => {
            info!(status, "No crawl policy published");
            PolicyVerdict::Allowed { crawl_delay: None }
        }
        Err(e) => PolicyVerdict::Unavailable(e.to_string()),
    };

    match &verdict {
        PolicyVerdict::Allowed { crawl_delay } => info!(
            allowed = true,
            crawl_delay = %crawl_delay.map_or_else(|| "none".to_string(), |d| format!("{d}s")),
            "Crawl policy checked"
        ),
        PolicyVerdict::Disallowed => warn!(allowed = false, target = %config.base_url, "Crawl policy forbids this site"),
        PolicyVerdict::Unavailable(reason) => {
            warn!(%reason, "Could not read crawl policy; proceeding without it")
        }
    }
    verdict
}
