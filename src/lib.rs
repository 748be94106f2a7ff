//! # Syft
//!
//! Client side of the Syft media search service: pick an audio or video file,
//! optionally type some keywords, send both to the search API and jump
//! straight to the moments it found.
//!
//! ```rust,no_run
//! use syft::{SearchController, SelectedFile, SyftClient};
//!
//! # async fn example() -> Result<(), syft::SyftError> {
//! let client = SyftClient::builder("http://127.0.0.1:5000").build()?;
//! let session = SearchController::with_client(client);
//!
//! session.select_file(SelectedFile::from_path("talk.mp3", 2048)).await;
//! session.set_query_text("quarterly results").await;
//! session.submit().await;
//!
//! println!("{:?}", session.screen().await);
//! # Ok(())
//! # }
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`encode`] | File bytes to base64 data URI |
//! | [`client`] | HTTP transport for `POST /api/search/` |
//! | [`session`] | Search state machine and view projection |
//! | [`player`] | Seek/play navigation from results to the audio transport |
//! | [`picker`] | Type and size checks at the file drop boundary |

pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod model;
pub mod picker;
pub mod player;
pub mod session;

pub use client::{SearchTransport, SyftClient, SyftClientBuilder};
pub use config::{load_config, AppConfig, ClientConfig, PickerConfig};
pub use encode::{DataUriEncoder, Encoder};
pub use error::{FailureKind, SyftError, SyftResult};
pub use model::*;
pub use picker::FilePicker;
pub use player::{AudioTransport, ResultsNavigator};
pub use session::{Phase, Screen, SearchController, SessionState, SubmitOutcome};
