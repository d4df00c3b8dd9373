//! # Request Lifecycle
//!
//! Every screen that loads data walks the same three states.
//!
//! ```text
//!            Request                Success(data)
//!   ┌──────────────────┐      ┌──────────────────────┐
//!   │                  ▼      │                      ▼
//!  any ──────────► LOADING ───┤                    OK(data)
//!                             │   Fail(error)
//!                             └──────────────────► ERROR(error)
//! ```
//!
//! The error defaults to the one-line message; callers that need the
//! machine-readable code carry their own error type instead.

use serde::{Deserialize, Serialize};

/// Result of a screen's data load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum RequestState<T, E = String> {
    /// Screens start out loading.
    #[default]
    Loading,
    Ok(T),
    Error(E),
}

/// The three events of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestAction<T, E = String> {
    Request,
    Success(T),
    Fail(E),
}

impl<T, E> RequestState<T, E> {
    /// Moves to the state `action` leads to.
    pub fn apply(self, action: RequestAction<T, E>) -> Self {
        match action {
            RequestAction::Request => RequestState::Loading,
            RequestAction::Success(data) => RequestState::Ok(data),
            RequestAction::Fail(error) => RequestState::Error(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Ok(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            RequestState::Error(error) => Some(error),
            _ => None,
        }
    }

    /// The finished outcome; `None` while still loading.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            RequestState::Loading => None,
            RequestState::Ok(data) => Some(Ok(data)),
            RequestState::Error(error) => Some(Err(error)),
        }
    }
}

/// Secondary "update / delete / cancel in progress" flag of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationState {
    #[default]
    Idle,
    InFlight,
}

impl MutationState {
    /// Marks the start of a mutation, refusing a second one while the
    /// first is still running.
    pub fn begin(&mut self) -> bool {
        if *self == MutationState::InFlight {
            return false;
        }
        *self = MutationState::InFlight;
        true
    }

    pub fn finish(&mut self) {
        *self = MutationState::Idle;
    }

    pub fn is_in_flight(&self) -> bool {
        *self == MutationState::InFlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let state: RequestState<u32> = RequestState::default();
        assert!(state.is_loading());

        let state = state.apply(RequestAction::Success(7));
        assert_eq!(state.data(), Some(&7));

        let state = state.apply(RequestAction::Request);
        assert!(state.is_loading());

        let state = state.apply(RequestAction::Fail("Network Error".into()));
        assert_eq!(state.error().map(String::as_str), Some("Network Error"));
        assert_eq!(state.data(), None);
    }

    #[test]
    fn test_into_result() {
        let loading: RequestState<u32> = RequestState::Loading;
        assert_eq!(loading.into_result(), None);

        let ok: RequestState<u32, u16> = RequestState::Ok(2);
        assert_eq!(ok.into_result(), Some(Ok(2)));

        let failed: RequestState<u32, u16> = RequestState::Error(404);
        assert_eq!(failed.into_result(), Some(Err(404)));
    }

    #[test]
    fn test_mutation_single_flight() {
        let mut m = MutationState::default();
        assert!(m.begin());
        assert!(!m.begin());
        assert!(m.is_in_flight());
        m.finish();
        assert!(m.begin());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(RequestState::<_, String>::Ok(vec![1, 2])).unwrap();
        assert_eq!(json["state"], "ok");
        assert_eq!(json["value"][1], 2);
    }
}
