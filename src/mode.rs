//! The decision machine: turns a pipeline verdict into an action, gated by the
//! configured [`Mode`](crate::config::Mode) for that decision point.

use crate::config::Mode;

/// Outcome of a single enforcement check (request validation, response validation,
/// or shadow-endpoint detection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The check passed; nothing to enforce.
    Pass,
    /// The check failed.
    Fail,
}

/// What the pipeline should do as a result of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue the pipeline unchanged.
    Allow,
    /// Continue the pipeline, but emit a log record noting the violation.
    AllowAndLog,
    /// Reject the request/response.
    Block,
}

/// Resolve `(verdict, mode)` into an action.
///
/// `DISABLE` never blocks or logs: the check is effectively not enforced.
/// `LOG_ONLY` never blocks but records every failure.
/// `BLOCK` rejects on failure.
pub fn resolve(verdict: Verdict, mode: Mode) -> Action {
    match (verdict, mode) {
        (Verdict::Pass, _) => Action::Allow,
        (Verdict::Fail, Mode::Disable) => Action::Allow,
        (Verdict::Fail, Mode::LogOnly) => Action::AllowAndLog,
        (Verdict::Fail, Mode::Block) => Action::Block,
    }
}

/// Shadow-endpoint specific resolution: in `DISABLE` mode, shadow endpoints are silent
/// unless `ShadowAPI.LogInDisableMode` is set.
pub fn resolve_shadow(verdict: Verdict, mode: Mode, log_in_disable_mode: bool) -> Action {
    match resolve(verdict, mode) {
        Action::Allow if verdict == Verdict::Fail && mode == Mode::Disable && log_in_disable_mode => {
            Action::AllowAndLog
        }
        other => other,
    }
}
