//! Feed client
//!
//! Fetches a scheme's full price history and answers the two port queries
//! against it. The feed serves prices newest-first as strings with
//! `dd-mm-yyyy` dates; parsing normalizes everything into the domain's
//! [`NavHistory`] shape.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use core_kernel::{PortError, SchemeCode};
use domain_holdings::nav::{NavHistory, NavPoint};
use domain_holdings::ports::NavProvider;

use crate::config::NavFeedConfig;
use crate::error::NavFeedError;

const FEED_DATE_FORMAT: &str = "%d-%m-%Y";

/// Raw feed payload for one scheme
#[derive(Debug, Deserialize)]
struct SchemeFeed {
    #[serde(default)]
    data: Vec<FeedPoint>,
}

/// One raw price record; the feed encodes both fields as strings
#[derive(Debug, Deserialize)]
struct FeedPoint {
    date: String,
    nav: String,
}

/// HTTP client for the registrar NAV feed
#[derive(Debug, Clone)]
pub struct NavFeedClient {
    http: reqwest::Client,
    config: NavFeedConfig,
}

impl NavFeedClient {
    /// Creates a client from configuration
    pub fn new(config: NavFeedConfig) -> Result<Self, NavFeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetches and parses the full price history for a scheme
    ///
    /// Retries transport failures up to the configured attempt count with
    /// a linear backoff; an empty feed is not retried.
    pub async fn fetch_history(&self, scheme: SchemeCode) -> Result<NavHistory, NavFeedError> {
        let url = format!("{}/mf/{}", self.config.base_url, scheme);

        let mut attempt = 0;
        let feed = loop {
            attempt += 1;
            match self.fetch_feed(&url).await {
                Ok(feed) => break feed,
                Err(err) if attempt < self.config.max_attempts => {
                    warn!(%scheme, attempt, error = %err, "NAV feed fetch failed, retrying");
                    tokio::time::sleep(Duration::from_millis(500 * u64::from(attempt))).await;
                }
                Err(err) => return Err(err),
            }
        };

        let history = parse_feed(scheme, feed)?;
        if history.is_empty() {
            return Err(NavFeedError::EmptyFeed(scheme));
        }
        debug!(%scheme, points = history.len(), "fetched NAV history");
        Ok(history)
    }

    async fn fetch_feed(&self, url: &str) -> Result<SchemeFeed, NavFeedError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<SchemeFeed>().await?)
    }
}

/// Normalizes the raw feed into a sorted price history
fn parse_feed(scheme: SchemeCode, feed: SchemeFeed) -> Result<NavHistory, NavFeedError> {
    let mut points = Vec::with_capacity(feed.data.len());
    for record in feed.data {
        let date = NaiveDate::parse_from_str(&record.date, FEED_DATE_FORMAT)
            .map_err(|e| NavFeedError::Parse(format!("bad date {:?}: {e}", record.date)))?;
        let value: Decimal = record
            .nav
            .parse()
            .map_err(|e| NavFeedError::Parse(format!("bad nav {:?}: {e}", record.nav)))?;
        points.push(NavPoint { date, value });
    }
    Ok(NavHistory::from_points(scheme, points))
}

#[async_trait]
impl NavProvider for NavFeedClient {
    async fn price_near(&self, scheme: SchemeCode, date: NaiveDate) -> Result<Decimal, PortError> {
        let history = self.fetch_history(scheme).await.map_err(PortError::from)?;
        history.price_near(date).ok_or_else(|| {
            PortError::price_unavailable(format!(
                "no price for scheme {scheme} within tolerance of {date}"
            ))
        })
    }

    async fn latest_price(&self, scheme: SchemeCode) -> Result<Decimal, PortError> {
        let history = self.fetch_history(scheme).await.map_err(PortError::from)?;
        history
            .latest()
            .map(|p| p.value)
            .ok_or_else(|| PortError::price_unavailable(format!("no prices for scheme {scheme}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feed_from_json(json: &str) -> SchemeFeed {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_feed_newest_first() {
        let feed = feed_from_json(
            r#"{
                "meta": {"scheme_name": "Example Equity Fund"},
                "data": [
                    {"date": "03-06-2024", "nav": "54.2871"},
                    {"date": "31-05-2024", "nav": "54.1002"},
                    {"date": "30-05-2024", "nav": "53.9987"}
                ]
            }"#,
        );

        let history = parse_feed(SchemeCode(120503), feed).unwrap();
        assert_eq!(history.len(), 3);
        let latest = history.latest().unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(latest.value, dec!(54.2871));
    }

    #[test]
    fn test_parse_feed_rejects_bad_date() {
        let feed = feed_from_json(r#"{"data": [{"date": "2024-06-03", "nav": "54.2871"}]}"#);
        assert!(matches!(
            parse_feed(SchemeCode(1), feed),
            Err(NavFeedError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_feed_rejects_bad_nav() {
        let feed = feed_from_json(r#"{"data": [{"date": "03-06-2024", "nav": "N.A."}]}"#);
        assert!(matches!(
            parse_feed(SchemeCode(1), feed),
            Err(NavFeedError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_data_field_is_empty() {
        let feed = feed_from_json(r#"{"status": "FAIL"}"#);
        let history = parse_feed(SchemeCode(1), feed).unwrap();
        assert!(history.is_empty());
    }
}
