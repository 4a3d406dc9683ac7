use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::gemini::ReportGenerator;
use crate::profile::FinancialProfile;
use crate::report::Report;

/// Where an analysis session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Input,
    Loading,
    Result,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("an analysis is already running")]
    Busy,
}

/// One user's analysis session: collect a profile, run one analysis at a
/// time, show either the report or an error message.
#[derive(Debug, Default)]
pub struct Session {
    state: AppState,
    profile: Option<FinancialProfile>,
    report: Option<Report>,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// The most recently submitted profile. Kept after a failed analysis.
    pub fn profile(&self) -> Option<&FinancialProfile> {
        self.profile.as_ref()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// User-facing message from the last failed analysis.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Run one analysis. On success the session moves to [`AppState::Result`];
    /// on failure it returns to [`AppState::Input`] with the error message set.
    /// If the returned future is dropped before it finishes, the session goes
    /// back to [`AppState::Input`].
    pub async fn analyze<G: ReportGenerator>(
        &mut self,
        generator: &G,
        profile: FinancialProfile,
    ) -> Result<AppState, SessionError> {
        if self.state == AppState::Loading {
            return Err(SessionError::Busy);
        }

        let loading = Loading::enter(&mut self.state);
        self.error = None;
        self.report = None;

        let result = generator.generate(&profile).await;
        let next = match result {
            Ok(markdown) => {
                log::info!("analysis complete");
                self.report = Some(Report::new(profile.clone(), markdown, unix_now()));
                AppState::Result
            }
            Err(e) => {
                log::error!("analysis failed: {e}");
                self.error = Some(e.user_message().to_string());
                AppState::Input
            }
        };
        loading.finish(next);
        self.profile = Some(profile);
        Ok(self.state)
    }

    /// Start over: back to input, report and error cleared.
    pub fn reset(&mut self) {
        self.state = AppState::Input;
        self.report = None;
        self.error = None;
    }
}

/// Holds the session in [`AppState::Loading`] for the length of one analysis.
struct Loading<'a> {
    state: &'a mut AppState,
}

impl<'a> Loading<'a> {
    fn enter(state: &'a mut AppState) -> Self {
        *state = AppState::Loading;
        Self { state }
    }

    fn finish(self, next: AppState) {
        *self.state = next;
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        if *self.state == AppState::Loading {
            log::warn!("analysis cancelled before it finished");
            *self.state = AppState::Input;
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    use super::*;
    use crate::gemini::{GENERATION_FAILED_MESSAGE, ReportError};
    use pretty_assertions::assert_eq;

    struct Canned(&'static str);

    impl ReportGenerator for Canned {
        async fn generate(&self, _profile: &FinancialProfile) -> Result<String, ReportError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl ReportGenerator for Failing {
        async fn generate(&self, _profile: &FinancialProfile) -> Result<String, ReportError> {
            Err(ReportError::EmptyResponse)
        }
    }

    /// Never answers.
    struct Stalled;

    impl ReportGenerator for Stalled {
        async fn generate(&self, _profile: &FinancialProfile) -> Result<String, ReportError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn success_shows_report() {
        let mut session = Session::new();
        let state = session
            .analyze(&Canned("# Plan\n- save"), FinancialProfile::default())
            .await
            .unwrap();

        assert_eq!(state, AppState::Result);
        assert_eq!(session.error(), None);
        let report = session.report().unwrap();
        assert_eq!(report.markdown, "# Plan\n- save");
        assert_eq!(report.blocks.len(), 2);
    }

    #[tokio::test]
    async fn failure_returns_to_input_with_message() {
        let mut session = Session::new();
        let profile = FinancialProfile {
            age: 41,
            ..FinancialProfile::default()
        };
        let state = session.analyze(&Failing, profile).await.unwrap();

        assert_eq!(state, AppState::Input);
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert!(session.report().is_none());
        assert_eq!(session.profile().map(|p| p.age), Some(41));
    }

    #[tokio::test]
    async fn new_analysis_clears_previous_error() {
        let mut session = Session::new();
        session
            .analyze(&Failing, FinancialProfile::default())
            .await
            .unwrap();
        session
            .analyze(&Canned("ok"), FinancialProfile::default())
            .await
            .unwrap();
        assert_eq!(session.state(), AppState::Result);
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn busy_session_rejects_analysis() {
        let mut session = Session {
            state: AppState::Loading,
            ..Session::default()
        };
        let result = session
            .analyze(&Canned("x"), FinancialProfile::default())
            .await;
        assert_eq!(result, Err(SessionError::Busy));
    }

    #[tokio::test]
    async fn cancelled_analysis_returns_to_input() {
        let mut session = Session::new();
        {
            let analysis = pin!(session.analyze(&Stalled, FinancialProfile::default()));
            let mut cx = Context::from_waker(Waker::noop());
            assert!(matches!(analysis.poll(&mut cx), Poll::Pending));
        }
        assert_eq!(session.state(), AppState::Input);
        assert!(session.report().is_none());

        let state = session
            .analyze(&Canned("# Plan"), FinancialProfile::default())
            .await
            .unwrap();
        assert_eq!(state, AppState::Result);
    }

    #[tokio::test]
    async fn reset_clears_report() {
        let mut session = Session::new();
        session
            .analyze(&Canned("text"), FinancialProfile::default())
            .await
            .unwrap();
        session.reset();
        assert_eq!(session.state(), AppState::Input);
        assert!(session.report().is_none());
        assert!(session.profile().is_some());
    }
}
