//! Result retrieval and the polling loop.
//!
//! `--poll` bounds the total wall-clock time spent polling; `--timeout` is the
//! sleep between fetches. Polling stops as soon as a page comes back without
//! a cursor, or once the window has elapsed, checked both after a fetch and
//! after each sleep.

use std::time::Duration;

use orbital_api::ResultsSource;
use orbital_api_models::ResultsPage;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::cli::{ResultsArgs, StatusArgs};
use crate::client::{AppContext, CliResult, service_result};
use crate::output::{render_results_page, render_status};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PollSettings {
    pub(crate) window: Duration,
    pub(crate) interval: Duration,
}

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollOutcome {
    /// The last page carried no cursor.
    Done,
    /// The window elapsed while more pages were pending.
    Expired,
}

pub(crate) async fn handle_results(ctx: &AppContext, args: ResultsArgs) -> CliResult<()> {
    let ResultsArgs {
        job_id,
        cursor,
        poll,
        timeout,
    } = args;
    let session = Session::establish(ctx).await?;

    let Some(window) = poll else {
        let page = fetch_page(session.api(), &job_id, &cursor).await?;
        return render_results_page(&page);
    };

    let settings = PollSettings {
        window: Duration::from_secs(window),
        interval: Duration::from_secs(timeout),
    };
    let outcome = poll_results(session.api(), &job_id, cursor, settings, render_results_page).await?;
    if outcome == PollOutcome::Expired {
        warn!(
            job = %job_id,
            window_secs = window,
            "polling window elapsed before all results were returned"
        );
    }
    Ok(())
}

pub(crate) async fn handle_status(ctx: &AppContext, args: StatusArgs) -> CliResult<()> {
    let StatusArgs { job_id } = args;
    let session = Session::establish(ctx).await?;
    let page = fetch_page(session.api(), &job_id, "").await?;
    render_status(&job_id, &page);
    Ok(())
}

/// Fetch pages until the cursor runs out or the window elapses.
///
/// Every fetched page is handed to `on_page` before the loop decides whether
/// to continue. A service-reported error ends the run with that error.
pub(crate) async fn poll_results<S, F>(
    source: &S,
    job_id: &str,
    mut cursor: String,
    settings: PollSettings,
    mut on_page: F,
) -> CliResult<PollOutcome>
where
    S: ResultsSource + ?Sized,
    F: FnMut(&ResultsPage) -> CliResult<()> + Send,
{
    let started = Instant::now();
    loop {
        let page = fetch_page(source, job_id, &cursor).await?;
        on_page(&page)?;

        if !page.has_more() {
            return Ok(PollOutcome::Done);
        }
        if started.elapsed() >= settings.window {
            return Ok(PollOutcome::Expired);
        }

        debug!(
            job = job_id,
            next = %page.next,
            sleep_secs = settings.interval.as_secs(),
            "more results pending"
        );
        sleep(settings.interval).await;
        if started.elapsed() >= settings.window {
            return Ok(PollOutcome::Expired);
        }
        cursor = page.next;
    }
}

async fn fetch_page<S>(source: &S, job_id: &str, cursor: &str) -> CliResult<ResultsPage>
where
    S: ResultsSource + ?Sized,
{
    service_result(source.fetch_results(job_id, cursor).await)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use httpmock::prelude::*;
    use orbital_api::{ApiOutcome, ApiResult, ServiceFailure};
    use serde_json::json;

    use super::*;
    use crate::client::CliError;
    use crate::client::test_support::context_with;

    /// Serves canned pages and records the cursor of every request.
    struct ScriptedSource {
        pages: Mutex<VecDeque<ApiOutcome<ResultsPage>>>,
        cursors: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<ApiOutcome<ResultsPage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                cursors: Mutex::new(Vec::new()),
            }
        }

        fn cursors(&self) -> Vec<String> {
            self.cursors.lock().expect("cursor log").clone()
        }
    }

    #[async_trait]
    impl ResultsSource for ScriptedSource {
        async fn fetch_results(
            &self,
            _job_id: &str,
            cursor: &str,
        ) -> ApiResult<ApiOutcome<ResultsPage>> {
            self.cursors
                .lock()
                .expect("cursor log")
                .push(cursor.to_string());
            Ok(self
                .pages
                .lock()
                .expect("page script")
                .pop_front()
                .expect("poller fetched more pages than scripted"))
        }
    }

    fn page(next: &str) -> ApiOutcome<ResultsPage> {
        ApiOutcome::Success(ResultsPage {
            next: next.to_string(),
            results: vec![json!({"host": "a"})],
        })
    }

    const fn settings(window_secs: u64) -> PollSettings {
        PollSettings {
            window: Duration::from_secs(window_secs),
            interval: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn empty_cursor_on_first_page_fetches_once() {
        let source = ScriptedSource::new(vec![page("")]);
        let mut seen = 0;
        let outcome = poll_results(&source, "job", String::new(), settings(10), |_| {
            seen += 1;
            Ok(())
        })
        .await
        .expect("poll");
        assert_eq!(outcome, PollOutcome::Done);
        assert_eq!(seen, 1);
        assert_eq!(source.cursors(), [""]);
    }

    #[tokio::test]
    async fn cursor_advances_until_exhausted() {
        let source = ScriptedSource::new(vec![page("c1"), page("c2"), page("")]);
        let outcome = poll_results(&source, "job", "c0".into(), settings(60), |_| Ok(()))
            .await
            .expect("poll");
        assert_eq!(outcome, PollOutcome::Done);
        assert_eq!(source.cursors(), ["c0", "c1", "c2"]);
    }

    #[tokio::test]
    async fn elapsed_window_stops_with_pages_pending() {
        let source = ScriptedSource::new(vec![page("c1")]);
        let outcome = poll_results(&source, "job", String::new(), settings(0), |_| Ok(()))
            .await
            .expect("poll");
        assert_eq!(outcome, PollOutcome::Expired);
        assert_eq!(source.cursors().len(), 1);
    }

    #[tokio::test]
    async fn window_closing_during_sleep_skips_next_fetch() {
        let source = ScriptedSource::new(vec![page("c1")]);
        let settings = PollSettings {
            window: Duration::from_millis(50),
            interval: Duration::from_millis(200),
        };
        let started = Instant::now();
        let outcome = poll_results(&source, "job", String::new(), settings, |_| Ok(()))
            .await
            .expect("poll");
        assert_eq!(outcome, PollOutcome::Expired);
        assert_eq!(source.cursors(), [""]);
        assert!(started.elapsed() >= settings.interval);
    }

    #[tokio::test]
    async fn open_window_keeps_fetching_after_sleep() {
        let source = ScriptedSource::new(vec![page("c1"), page("")]);
        let settings = PollSettings {
            window: Duration::from_secs(30),
            interval: Duration::from_millis(20),
        };
        let outcome = poll_results(&source, "job", String::new(), settings, |_| Ok(()))
            .await
            .expect("poll");
        assert_eq!(outcome, PollOutcome::Done);
        assert_eq!(source.cursors(), ["", "c1"]);
    }

    #[tokio::test]
    async fn service_error_ends_polling() {
        let source = ScriptedSource::new(vec![
            page("c1"),
            ApiOutcome::Failure(ServiceFailure {
                status: 200,
                message: "job not found".into(),
            }),
        ]);
        let err = poll_results(&source, "job", String::new(), settings(60), |_| Ok(()))
            .await
            .expect_err("service error");
        assert!(matches!(err, CliError::Service(failure) if failure.message == "job not found"));
    }

    #[tokio::test]
    async fn results_without_poll_fetch_a_single_page() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v0/jobs/job-1/results")
                .header("authorization", "Bearer tok");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"next": "c1", "results": [{"host": "a"}]}));
        });

        let args = ResultsArgs {
            job_id: "job-1".into(),
            ..ResultsArgs::default()
        };
        handle_results(&context_with(&server), args)
            .await
            .expect("results");
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn status_reports_service_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v0/jobs/job-404/results");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"error": "job not found"}));
        });

        let err = handle_status(
            &context_with(&server),
            StatusArgs {
                job_id: "job-404".into(),
            },
        )
        .await
        .expect_err("missing job");
        assert!(matches!(err, CliError::Service(_)));
    }
}
