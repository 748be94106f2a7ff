//! Observable state for the view layer, derived from [`SessionState`].

use serde::Serialize;

use super::{Phase, SessionState};
use crate::model::search::MatchRow;
use crate::picker::EMPTY_LABEL;

/// The one screen the view should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Screen {
    /// Search form. `banner` is set after a failed attempt.
    Form {
        drop_label: String,
        can_submit: bool,
        banner: Option<&'static str>,
    },
    /// Request in flight; inputs disabled.
    Searching { drop_label: String },
    /// Ranked results in server order.
    Results {
        access_link: String,
        elapsed_time: f64,
        rows: Vec<MatchRow>,
    },
    /// Successful search that found nothing. Not an error.
    NoMatches { access_link: String, elapsed_time: f64 },
}

impl SessionState {
    pub fn drop_label(&self) -> String {
        self.selected_file()
            .map(|f| f.name().to_string())
            .unwrap_or_else(|| EMPTY_LABEL.to_string())
    }

    pub fn screen(&self) -> Screen {
        match (self.phase(), self.last_response()) {
            (Phase::Submitting, _) => Screen::Searching {
                drop_label: self.drop_label(),
            },
            (Phase::Ready, Some(resp)) if !resp.has_matches() => Screen::NoMatches {
                access_link: resp.access_link.clone(),
                elapsed_time: resp.elapsed_time_seconds,
            },
            (Phase::Ready, Some(resp)) => Screen::Results {
                access_link: resp.access_link.clone(),
                elapsed_time: resp.elapsed_time_seconds,
                rows: resp.matches.iter().map(|m| m.row()).collect(),
            },
            _ => Screen::Form {
                drop_label: self.drop_label(),
                can_submit: self.can_submit(),
                banner: self.last_error().map(|kind| kind.banner()),
            },
        }
    }
}
