//! Client core for the AI podcast generator.
//!
//! Assembles user input (pasted text, a local file, or a URL) together with
//! generation parameters, submits a single request to the remote generation
//! service, and turns the heterogeneous response into presentable artifacts:
//! a playable audio asset and the accompanying script text.
//!
//! The service has shipped two response protocols and both are supported:
//! a binary body with the script in an `x-script` header, and a JSON body
//! referencing a server-side audio file. [`studio::client::PodcastClient`]
//! tells them apart by response shape; [`studio::session::Session`] drives
//! the submission lifecycle around it.

pub mod studio;

pub use studio::artifacts::{ArtifactError, ArtifactStore, AudioArtifact, AudioHandle};
pub use studio::catalog::{content_modes, podcast_styles, ContentOption, StyleOption};
pub use studio::client::{GenerationOutcome, PodcastClient};
pub use studio::content::ContentBuffer;
pub use studio::session::{SelectionEffect, Session, SessionView, SubmitOutcome};
pub use studio::types::{
    ApiError, ContentMode, GenerationRequest, PodcastStyle, ServiceConfig, Voice,
};
