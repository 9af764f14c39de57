//! Git lifecycle events that hooks bind to.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VibeError;

/// A git lifecycle event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    PreCommit,
    CommitMsg,
    PrePush,
    PostCommit,
    PostMerge,
}

impl HookEvent {
    /// All supported events, in git's lifecycle order.
    pub const ALL: [HookEvent; 5] = [
        HookEvent::PreCommit,
        HookEvent::CommitMsg,
        HookEvent::PostCommit,
        HookEvent::PrePush,
        HookEvent::PostMerge,
    ];

    /// The git hook name (`pre-commit`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::PreCommit => "pre-commit",
            HookEvent::CommitMsg => "commit-msg",
            HookEvent::PrePush => "pre-push",
            HookEvent::PostCommit => "post-commit",
            HookEvent::PostMerge => "post-merge",
        }
    }

    /// Whether git aborts the operation when this hook exits non-zero.
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            HookEvent::PreCommit | HookEvent::CommitMsg | HookEvent::PrePush
        )
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| VibeError::UnknownHookEvent {
                event: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_git_hook_names() {
        for event in HookEvent::ALL {
            assert_eq!(event.as_str().parse::<HookEvent>().unwrap(), event);
        }
    }

    #[test]
    fn rejects_unknown_event() {
        let err = "pre-rebase".parse::<HookEvent>().unwrap_err();
        assert!(matches!(err, VibeError::UnknownHookEvent { .. }));
    }

    #[test]
    fn serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&HookEvent::CommitMsg).unwrap(),
            "\"commit-msg\""
        );
        let e: HookEvent = serde_json::from_str("\"post-merge\"").unwrap();
        assert_eq!(e, HookEvent::PostMerge);
    }

    #[test]
    fn only_pre_events_block() {
        assert!(HookEvent::PrePush.is_blocking());
        assert!(HookEvent::CommitMsg.is_blocking());
        assert!(!HookEvent::PostCommit.is_blocking());
        assert!(!HookEvent::PostMerge.is_blocking());
    }
}
