use crate::Scope;

/// How a resolution request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The factory ran and produced a new value.
    Created,
    /// A container-scoped value was returned from the cache.
    Cached,
    /// No provider was registered under the key.
    NotFound,
    /// A value was produced but it was not the requested type.
    Mismatch,
    /// The factory reported an error.
    Failed,
}

/// Events emitted by a container during operations.
///
/// These events are passed to the callback set via
/// [`Container::set_trace_callback`](crate::Container::set_trace_callback).
///
/// # Examples
///
/// ```rust
/// use inject_container::{ContainerEvent, Scope};
///
/// let event = ContainerEvent::Register { key: "Mailer".into(), scope: Scope::Container };
/// assert_eq!(event.to_string(), "register { key: Mailer, scope: container }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerEvent {
    /// A provider was accepted.
    Register { key: String, scope: Scope },

    /// A value was requested.
    Resolve {
        key: String,
        outcome: ResolveOutcome,
    },
}

impl std::fmt::Display for ResolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResolveOutcome::Created => "created",
            ResolveOutcome::Cached => "cached",
            ResolveOutcome::NotFound => "not found",
            ResolveOutcome::Mismatch => "mismatch",
            ResolveOutcome::Failed => "failed",
        };
        f.write_str(label)
    }
}

impl std::fmt::Display for ContainerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerEvent::Register { key, scope } => {
                write!(f, "register {{ key: {key}, scope: {scope} }}")
            }
            ContainerEvent::Resolve { key, outcome } => {
                write!(f, "resolve {{ key: {key}, outcome: {outcome} }}")
            }
        }
    }
}
