//! Hook lifecycle events and the protocol message envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::HookError;

/// Extension points exposed by the test engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum HookEvent {
    BeforeAll,
    BeforeEach,
    Before,
    BeforeEachValidation,
    BeforeValidation,
    After,
    AfterEach,
    AfterAll,
}

impl HookEvent {
    pub const ALL: [Self; 8] = [
        Self::BeforeAll,
        Self::BeforeEach,
        Self::Before,
        Self::BeforeEachValidation,
        Self::BeforeValidation,
        Self::After,
        Self::AfterEach,
        Self::AfterAll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeAll => "beforeAll",
            Self::BeforeEach => "beforeEach",
            Self::Before => "before",
            Self::BeforeEachValidation => "beforeEachValidation",
            Self::BeforeValidation => "beforeValidation",
            Self::After => "after",
            Self::AfterEach => "afterEach",
            Self::AfterAll => "afterAll",
        }
    }

    /// Events whose payload is the whole transaction list rather than one
    /// transaction.
    pub fn is_batch(self) -> bool {
        matches!(self, Self::BeforeAll | Self::AfterAll)
    }

    /// Events addressed to hooks registered under a transaction name.
    pub fn is_named(self) -> bool {
        matches!(self, Self::Before | Self::BeforeValidation | Self::After)
    }

    /// Named-hook event that runs alongside this one.
    ///
    /// The engine only sends the `*Each` events; named `before`,
    /// `beforeValidation` and `after` hooks ride on `beforeEach`,
    /// `beforeEachValidation` and `afterEach` respectively.
    pub fn named_counterpart(self) -> Option<Self> {
        match self {
            Self::BeforeEach | Self::Before => Some(Self::Before),
            Self::BeforeEachValidation | Self::BeforeValidation => Some(Self::BeforeValidation),
            Self::AfterEach | Self::After => Some(Self::After),
            Self::BeforeAll | Self::AfterAll => None,
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| HookError::UnknownEvent { event: s.to_string() })
    }
}

/// One newline-delimited frame of the hook protocol.
///
/// The handler answers every frame with the same envelope; only `data` may
/// differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookMessage {
    pub uuid: String,
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookMessage {
    pub fn new(uuid: impl Into<String>, event: HookEvent, data: Value) -> Self {
        Self { uuid: uuid.into(), event: event.as_str().to_string(), data, extra: Map::new() }
    }

    pub fn hook_event(&self) -> Result<HookEvent, HookError> {
        self.event.parse()
    }
}
