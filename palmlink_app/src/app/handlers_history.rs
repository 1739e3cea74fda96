use palmlink_client::error::ApiError;
use palmlink_client::models::HistoryFeed;

use super::state::ViewState;
use super::PalmlinkApp;

impl PalmlinkApp {
    pub(super) fn handle_history_loaded(&mut self, result: Result<HistoryFeed, ApiError>) {
        if self.view != ViewState::History {
            return;
        }
        self.history.is_loading = false;
        match result {
            Ok(feed) => {
                self.history.feed = Some(feed);
            }
            Err(err) => {
                if self.absorb_auth_failure(&err) {
                    return;
                }
                self.history.error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_token;
    use super::*;
    use palmlink_client::models::{HistoryEntry, ProfileCard};
    use pretty_assertions::assert_eq;

    fn feed() -> HistoryFeed {
        HistoryFeed {
            who_scanned_me: vec![HistoryEntry {
                time_scanned: "2024-06-10T09:00:00".into(),
                profile: ProfileCard {
                    name: "Ann".into(),
                    bio: None,
                    job_title: None,
                    company: None,
                    profile_picture: None,
                },
                contacts: vec![],
            }],
            who_i_scanned: vec![],
        }
    }

    #[test]
    fn loaded_feed_populates_history() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::History;
        app.history.is_loading = true;

        app.handle_history_loaded(Ok(feed()));
        assert!(!app.history.is_loading);
        assert_eq!(
            app.history.feed.as_ref().map(|f| f.who_scanned_me.len()),
            Some(1)
        );
    }

    #[test]
    fn history_auth_failure_forces_login() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::History;
        app.handle_history_loaded(Err(ApiError::Auth {
            status: 401,
            message: "expired".into(),
        }));
        assert_eq!(app.session.token(), None);
        assert_eq!(app.view, ViewState::Login);
        assert!(app.history.feed.is_none());
    }

    #[test]
    fn history_result_is_dropped_after_leaving_screen() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::Home;
        app.handle_history_loaded(Ok(feed()));
        assert!(app.history.feed.is_none());
    }

    #[test]
    fn history_error_is_recoverable_in_place() {
        let mut app = app_with_token(Some("tok"));
        app.view = ViewState::History;
        app.history.is_loading = true;
        app.handle_history_loaded(Err(ApiError::Network("refused".into())));
        assert_eq!(app.view, ViewState::History);
        assert!(app.history.error.is_some());

        // Manual retry returns the screen to its loading state.
        app.spawn_load_history();
        assert!(app.history.is_loading);
        assert_eq!(app.history.error, None);
    }
}
