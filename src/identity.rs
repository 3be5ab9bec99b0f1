//! Who is playing: supplies the name recorded on the leaderboard.

pub trait Identity {
    /// `None` when the player is unknown; the session then records the
    /// configured placeholder.
    fn display_name(&self) -> Option<String>;
}

/// Reads the login name from `$USER` (or `$USERNAME` on Windows).
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvIdentity;

impl Identity for EnvIdentity {
    fn display_name(&self) -> Option<String> {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn display_name(&self) -> Option<String> {
        None
    }
}

#[derive(Clone, Debug)]
pub struct FixedIdentity(pub String);

impl Identity for FixedIdentity {
    fn display_name(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
