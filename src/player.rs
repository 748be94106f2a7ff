use crate::error::{SyftError, SyftResult};
use crate::model::search::{MatchResult, SearchResponse};

// ---------------------------------------------------------------------------
// AudioTransport trait: the playback engine we drive
// ---------------------------------------------------------------------------

/// Capability offered by an audio/video player.
pub trait AudioTransport {
    /// Point the player at a new media URI. The player is not ready until it
    /// has loaded the source.
    fn load_source(&mut self, uri: &str);

    /// Move the play position to `seconds` from the start.
    fn seek(&mut self, seconds: f64);

    fn play(&mut self);

    /// Whether the current source has loaded.
    fn is_ready(&self) -> bool;
}

// ---------------------------------------------------------------------------
// ResultsNavigator
// ---------------------------------------------------------------------------

/// Turns clicks on result rows into seek + play on the audio transport.
///
/// Seeks requested before the source has loaded are held back. Only the most
/// recent one is kept and it is applied once by [`source_ready`].
///
/// [`source_ready`]: ResultsNavigator::source_ready
#[derive(Debug, Default)]
pub struct ResultsNavigator {
    pending_seek: Option<f64>,
}

impl ResultsNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the response's media into the transport. Seeks queued for the
    /// previous source are dropped.
    pub fn load<T: AudioTransport + ?Sized>(&mut self, response: &SearchResponse, transport: &mut T) {
        self.pending_seek = None;
        tracing::debug!(access_link = %response.access_link, "loading media source");
        transport.load_source(&response.access_link);
    }

    /// Seek to the start of `m` and play, or queue the seek if the source is
    /// still loading.
    pub fn activate<T: AudioTransport + ?Sized>(
        &mut self,
        m: &MatchResult,
        transport: &mut T,
    ) -> SyftResult<()> {
        let target = m.start_time;
        if !target.is_finite() || target < 0.0 {
            return Err(SyftError::InvalidArgument(format!(
                "match start time must be a non-negative number of seconds, got {target}"
            )));
        }

        if transport.is_ready() {
            self.pending_seek = None;
            seek_and_play(transport, target);
        } else if let Some(previous) = self.pending_seek.replace(target) {
            tracing::debug!(previous, target, "replacing pending seek");
        } else {
            tracing::debug!(target, "source not ready, deferring seek");
        }
        Ok(())
    }

    /// Call when the transport reports its source has loaded.
    pub fn source_ready<T: AudioTransport + ?Sized>(&mut self, transport: &mut T) {
        if let Some(target) = self.pending_seek.take() {
            seek_and_play(transport, target);
        }
    }

    /// Seek target waiting for the source, if any.
    pub fn pending_seek(&self) -> Option<f64> {
        self.pending_seek
    }
}

fn seek_and_play<T: AudioTransport + ?Sized>(transport: &mut T, seconds: f64) {
    tracing::debug!(seconds, "seek and play");
    transport.seek(seconds);
    transport.play();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingTransport {
        source: Option<String>,
        ready: bool,
        seeks: Vec<f64>,
        plays: usize,
    }

    impl AudioTransport for RecordingTransport {
        fn load_source(&mut self, uri: &str) {
            self.source = Some(uri.to_string());
            self.ready = false;
        }

        fn seek(&mut self, seconds: f64) {
            self.seeks.push(seconds);
        }

        fn play(&mut self) {
            self.plays += 1;
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    fn hit(start: f64, end: f64) -> MatchResult {
        MatchResult {
            start_time: start,
            end_time: end,
            confidence: 0.1,
            transcript: "something else entirely".into(),
        }
    }

    fn response() -> SearchResponse {
        SearchResponse {
            access_link: "https://x/y".into(),
            elapsed_time_seconds: 0.42,
            matches: vec![hit(3.9, 5.6)],
        }
    }

    #[test]
    fn test_activate_seeks_to_exact_start() {
        let mut nav = ResultsNavigator::new();
        let mut player = RecordingTransport {
            ready: true,
            ..Default::default()
        };

        nav.activate(&hit(3.9, 120.0), &mut player).unwrap();
        assert_eq!(player.seeks, vec![3.9]);
        assert_eq!(player.plays, 1);
    }

    #[test]
    fn test_seek_waits_for_source() {
        let mut nav = ResultsNavigator::new();
        let mut player = RecordingTransport::default();
        nav.load(&response(), &mut player);
        assert_eq!(player.source.as_deref(), Some("https://x/y"));

        nav.activate(&hit(3.9, 5.6), &mut player).unwrap();
        assert!(player.seeks.is_empty());
        assert_eq!(nav.pending_seek(), Some(3.9));

        player.ready = true;
        nav.source_ready(&mut player);
        assert_eq!(player.seeks, vec![3.9]);
        assert_eq!(player.plays, 1);

        // Applied once only.
        nav.source_ready(&mut player);
        assert_eq!(player.seeks.len(), 1);
    }

    #[test]
    fn test_latest_pending_seek_wins() {
        let mut nav = ResultsNavigator::new();
        let mut player = RecordingTransport::default();

        nav.activate(&hit(1.0, 2.0), &mut player).unwrap();
        nav.activate(&hit(7.25, 8.0), &mut player).unwrap();
        player.ready = true;
        nav.source_ready(&mut player);

        assert_eq!(player.seeks, vec![7.25]);
    }

    #[test]
    fn test_loading_new_source_drops_pending_seek() {
        let mut nav = ResultsNavigator::new();
        let mut player = RecordingTransport::default();

        nav.activate(&hit(1.0, 2.0), &mut player).unwrap();
        nav.load(&response(), &mut player);
        assert_eq!(nav.pending_seek(), None);
    }

    #[test]
    fn test_negative_start_is_rejected() {
        let mut nav = ResultsNavigator::new();
        let mut player = RecordingTransport {
            ready: true,
            ..Default::default()
        };

        let err = nav.activate(&hit(-0.5, 1.0), &mut player).unwrap_err();
        assert!(matches!(err, SyftError::InvalidArgument(_)));
        assert!(player.seeks.is_empty());
    }
}
