use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::api::client::CockpitClient;
use crate::api::schedule::parse_schedule;
use crate::api::types::ScheduleBlock;

pub const DEFAULT_SCHEDULE_TTL: Duration = Duration::from_secs(5);

/// Fetches and parses today's schedule. Any failure degrades to an empty list.
pub async fn load_today(client: &CockpitClient) -> Vec<ScheduleBlock> {
    match client.today().await {
        Ok(body) => {
            let blocks = parse_schedule(&body);
            debug!(
                "event=schedule_fetch module=api status=ok blocks={}",
                blocks.len()
            );
            blocks
        }
        Err(e) => {
            warn!("event=schedule_fetch module=api status=error error={}", e);
            Vec::new()
        }
    }
}

/// Freshness of the last completed fetch, plus the in-flight flag. The
/// schedule itself lives in the view.
#[derive(Debug)]
pub struct ScheduleCache {
    ttl: Duration,
    fetched_at: Option<Instant>,
    in_flight: bool,
}

impl ScheduleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            fetched_at: None,
            in_flight: false,
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.fetched_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.ttl)
    }

    pub fn should_fetch(&self, now: Instant, force: bool) -> bool {
        if self.in_flight {
            return false;
        }
        force || !self.is_fresh(now)
    }

    pub fn begin_fetch(&mut self) {
        self.in_flight = true;
    }

    pub fn complete(&mut self, now: Instant) {
        self.in_flight = false;
        self.fetched_at = Some(now);
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEDULE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = "blocks:\n- start: 09:00\n  text: Standup\n";

    #[test]
    fn cache_is_fresh_within_ttl() {
        let mut cache = ScheduleCache::new(Duration::from_secs(5));
        let t0 = Instant::now();
        cache.complete(t0);

        assert!(cache.is_fresh(t0 + Duration::from_secs(4)));
        assert!(!cache.is_fresh(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn should_fetch_respects_force_and_in_flight() {
        let mut cache = ScheduleCache::new(Duration::from_secs(5));
        let t0 = Instant::now();
        assert!(cache.should_fetch(t0, false));

        cache.begin_fetch();
        assert!(cache.is_in_flight());
        assert!(!cache.should_fetch(t0, true));

        cache.complete(t0);
        assert!(!cache.is_in_flight());
        assert!(!cache.should_fetch(t0, false));
        assert!(cache.should_fetch(t0, true));
    }

    #[test]
    fn empty_cache_is_stale() {
        let cache = ScheduleCache::default();
        assert!(!cache.is_fresh(Instant::now()));
        assert!(cache.should_fetch(Instant::now(), false));
    }

    #[tokio::test]
    async fn load_today_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
            .mount(&server)
            .await;

        let blocks = load_today(&CockpitClient::new(&server.uri())).await;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Standup");
        assert_eq!(blocks[0].start_minute, Some(540));
    }

    #[tokio::test]
    async fn failed_fetch_degrades_to_empty_schedule() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CockpitClient::new(&server.uri());
        assert!(load_today(&client).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_server_degrades_to_empty_schedule() {
        let client = CockpitClient::new("http://127.0.0.1:9");
        assert!(load_today(&client).await.is_empty());
    }

    #[tokio::test]
    async fn hung_server_times_out_and_frees_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(BODY)
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = CockpitClient::with_timeout(&server.uri(), Duration::from_millis(200));
        let mut cache = ScheduleCache::default();
        cache.begin_fetch();

        let blocks = tokio::time::timeout(Duration::from_secs(10), load_today(&client))
            .await
            .expect("fetch should give up before the outer timeout");
        assert!(blocks.is_empty());

        cache.complete(Instant::now());
        assert!(cache.should_fetch(Instant::now(), true));
    }
}
