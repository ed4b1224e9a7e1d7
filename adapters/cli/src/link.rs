//! Single-line share codes describing a reproducible randomizer run.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use nexus_randomizer_core::Args;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{non_default_args, Kind};

const LINK_DOMAIN: &str = "nexus";
const LINK_VERSION: &str = "v1";

/// Identifier prefix emitted before the flavour and payload.
pub(crate) const LINK_HEADER: &str = "nexus:v1";
/// Delimiter separating the prefix, flavour and payload.
const FIELD_DELIMITER: char = ':';

/// Everything needed to regenerate a nexus against the same dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ShareLink {
    /// Randomizer flavour.
    pub(crate) kind: Kind,
    /// Template source as given on the command line.
    pub(crate) template: String,
    /// Seed label.
    pub(crate) seed: String,
    /// Rank generation time of the dataset the link was made against.
    pub(crate) dataset_id: u64,
    /// Arguments that differ from the flavour's defaults.
    pub(crate) args: Args,
}

#[derive(Serialize, Deserialize)]
struct LinkPayload {
    template: String,
    seed: String,
    #[serde(default)]
    dataset_id: u64,
    #[serde(default)]
    args: Args,
}

impl ShareLink {
    /// Builds a link, keeping only arguments that differ from the defaults.
    pub(crate) fn new(kind: Kind, template: &str, seed: &str, dataset_id: u64, args: &Args) -> Self {
        Self {
            kind,
            template: template.to_owned(),
            seed: seed.to_owned(),
            dataset_id,
            args: non_default_args(kind, args),
        }
    }

    /// Encodes the link as `nexus:v1:<kind>:<base64 json>`.
    pub(crate) fn encode(&self) -> Result<String, LinkError> {
        let payload = LinkPayload {
            template: self.template.clone(),
            seed: self.seed.clone(),
            dataset_id: self.dataset_id,
            args: self.args.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LinkError::InvalidPayload)?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        Ok(format!("{LINK_HEADER}:{}:{encoded}", self.kind.as_str()))
    }

    /// Decodes a link produced by [`ShareLink::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, LinkError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LinkError::EmptyPayload);
        }

        let mut parts = trimmed.splitn(4, FIELD_DELIMITER);
        let domain = parts.next().ok_or(LinkError::MissingPrefix)?;
        let version = parts.next().ok_or(LinkError::MissingVersion)?;
        let kind = parts.next().ok_or(LinkError::MissingKind)?;
        let payload = parts.next().ok_or(LinkError::MissingPayload)?;

        if domain != LINK_DOMAIN {
            return Err(LinkError::InvalidPrefix(domain.to_owned()));
        }
        if version != LINK_VERSION {
            return Err(LinkError::UnsupportedVersion(version.to_owned()));
        }
        let kind = parse_kind(kind)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LinkError::InvalidEncoding)?;
        let decoded: LinkPayload =
            serde_json::from_slice(&bytes).map_err(LinkError::InvalidPayload)?;

        Ok(Self {
            kind,
            template: decoded.template,
            seed: decoded.seed,
            dataset_id: decoded.dataset_id,
            args: decoded.args,
        })
    }
}

/// Errors that can occur while encoding or decoding share codes.
#[derive(Debug, Error)]
pub(crate) enum LinkError {
    /// The provided string was empty or contained only whitespace.
    #[error("share code was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("share code is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("share code is missing the version")]
    MissingVersion,
    /// The randomizer flavour segment was missing.
    #[error("share code is missing the randomizer kind")]
    MissingKind,
    /// The payload segment was missing.
    #[error("share code is missing the payload")]
    MissingPayload,
    /// The prefix segment named another domain.
    #[error("share code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment is not understood.
    #[error("share code version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The flavour segment named an unknown randomizer.
    #[error("unknown randomizer kind '{0}'")]
    InvalidKind(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode share code payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload JSON could not be produced or parsed.
    #[error("could not parse share code payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_kind(kind: &str) -> Result<Kind, LinkError> {
    [Kind::Atlas, Kind::Stock, Kind::Affinity]
        .into_iter()
        .find(|candidate| candidate.as_str() == kind)
        .ok_or_else(|| LinkError::InvalidKind(kind.to_owned()))
}
